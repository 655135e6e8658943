//! Error types for the autopilot runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a remote-debugging endpoint.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not reach the endpoint or finish the WebSocket handshake.
    #[error("Failed to connect to target: {0}")]
    ConnectionFailed(String),

    /// WebSocket-level send/receive failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint replied with a protocol-level error.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The evaluated script threw inside the target.
    #[error("Script exception: {0}")]
    ScriptException(String),

    /// No response arrived within the deadline.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The session's connection closed while a call was pending.
    #[error("Session closed")]
    SessionClosed,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
