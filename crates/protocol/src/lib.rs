//! Wire types for the editor's remote-debugging protocol.
//!
//! Two surfaces are covered:
//!
//! - the HTTP discovery endpoint (`GET /json/list`), which returns an array
//!   of [`TargetDescriptor`] records;
//! - the per-target WebSocket channel, which speaks JSON-RPC-style messages:
//!   an [`EvaluateRequest`] goes out with a unique integer `id`, and the
//!   matching [`Response`] comes back correlated by that same `id`.
//!
//! Everything here is plain serde data. Connection handling, correlation and
//! timeouts live in `autopilot-runtime`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One debuggable target as reported by the discovery endpoint.
///
/// Ephemeral: consumed immediately to decide whether to open a session,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDescriptor {
    /// Target identifier, unique per debug endpoint.
    #[serde(default)]
    pub id: String,
    /// Target kind: "page", "webview", "iframe", "other", ...
    #[serde(rename = "type", default)]
    pub kind: String,
    /// URL currently loaded in the target.
    #[serde(default)]
    pub url: String,
    /// Target title.
    #[serde(default)]
    pub title: String,
    /// WebSocket address for attaching a debug session. Absent on targets
    /// that already have a debugger attached.
    #[serde(rename = "webSocketDebuggerUrl", default)]
    pub ws_url: Option<String>,
}

/// Parameters for a `Runtime.evaluate` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateParams {
    /// Script text to run in the target's main execution context.
    pub expression: String,
    /// Resolve returned promises before replying.
    #[serde(rename = "awaitPromise")]
    pub await_promise: bool,
    #[serde(rename = "includeCommandLineAPI")]
    pub include_command_line_api: bool,
    /// Serialize the result by value instead of returning an object handle.
    #[serde(rename = "returnByValue")]
    pub return_by_value: bool,
}

/// Request frame sent over a session's WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// Unique ascending id used to correlate the response.
    pub id: u64,
    pub method: String,
    pub params: EvaluateParams,
}

impl EvaluateRequest {
    /// Builds a `Runtime.evaluate` request for `expression`.
    pub fn new(id: u64, expression: impl Into<String>) -> Self {
        Self {
            id,
            method: "Runtime.evaluate".to_string(),
            params: EvaluateParams {
                expression: expression.into(),
                await_promise: true,
                include_command_line_api: true,
                return_by_value: true,
            },
        }
    }
}

/// Response frame from the debug endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Request id this response correlates to.
    pub id: u64,
    /// Success payload (mutually exclusive with `error`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Protocol-level error (mutually exclusive with `result`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

/// Protocol-level error details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Unsolicited event frame. The session layer ignores these, but they must
/// parse cleanly so they never get confused with responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Discriminated union of inbound messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// Response message (has `id` field).
    Response(Response),
    /// Event message (has `method`, no `id`).
    Event(Event),
    /// Forward-compatible catch-all.
    Unknown(Value),
}

/// Result wrapper inside a successful `Runtime.evaluate` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateReturn {
    pub result: RemoteObject,
    #[serde(rename = "exceptionDetails", skip_serializing_if = "Option::is_none")]
    pub exception_details: Option<ExceptionDetails>,
}

/// A value mirrored back from the target's execution context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteObject {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Details of a script exception raised during evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionDetails {
    #[serde(default)]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
    /// Best human-readable description of the thrown value.
    pub fn message(&self) -> &str {
        self.exception
            .as_ref()
            .and_then(|e| e.description.as_deref())
            .unwrap_or(&self.text)
    }
}

/// Descriptor of the element the in-page scan script clicked.
///
/// Produced by the scan payload and returned by value through
/// `Runtime.evaluate`; `null` on the wire means "no candidate this cycle".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickReport {
    /// Lowercase tag name of the clicked element.
    pub tag: String,
    /// Visible text, truncated to a short snippet.
    #[serde(default)]
    pub text: String,
    /// Accessible label, when present.
    #[serde(default)]
    pub label: Option<String>,
    /// `title` attribute, when present.
    #[serde(default)]
    pub title: Option<String>,
    /// Heuristic score of the winning candidate.
    pub score: u8,
}
