//! Autopilot runtime - target discovery and debug-session management.
//!
//! This crate maintains a live set of WebSocket sessions against an editor's
//! remote-debugging endpoint:
//!
//! - **Discovery**: polling `GET /json/list` and filtering the returned
//!   targets down to the surfaces worth attaching to
//! - **Session**: one WebSocket connection per target, with strict
//!   request-id correlation for `Runtime.evaluate` round-trips
//! - **Manager**: the connect/evaluate-all/disconnect-all surface the poll
//!   driver talks to
//!
//! Discovery failures are expected and silent: an unreachable endpoint is
//! "zero targets", never an error. Per-session evaluation failures are
//! contained so one bad session never fails a batch.

pub mod discovery;
pub mod error;
pub mod manager;
pub mod session;

pub use discovery::{DEFAULT_PORT, DISCOVERY_TIMEOUT, is_eligible, list_targets};
pub use error::{Error, Result};
pub use manager::SessionManager;
pub use session::{EVALUATE_TIMEOUT, Session};
