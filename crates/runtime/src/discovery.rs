//! Target discovery against the editor's `/json/list` endpoint.
//!
//! The filter is deliberately permissive: a false positive costs one idle
//! connection, a false negative means a real button never gets clicked.
//! Embedded surfaces (webviews, iframes, "other") are accepted outright;
//! plain pages must look like the main workbench page; externally-loaded
//! web content and protocol-inspector pages are never accepted.

use std::time::Duration;

use autopilot_protocol::TargetDescriptor;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Default remote-debugging port.
pub const DEFAULT_PORT: u16 = 9000;

/// Hard ceiling on each discovery request.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_millis(300);

/// URL schemes that mark externally-loaded or inspector content.
const REJECTED_SCHEMES: &[&str] = &["http:", "https:", "devtools://"];

/// Target kinds attached to unconditionally.
const EMBEDDED_KINDS: &[&str] = &["webview", "iframe", "other"];

/// Fetches and parses the target list.
///
/// Never fails: an unreachable endpoint, a timeout, or malformed JSON all
/// come back as an empty list. Routine absence of a debug endpoint is the
/// common case and is logged at debug level only.
pub async fn list_targets(http: &reqwest::Client, port: u16) -> Vec<TargetDescriptor> {
    let url = format!("http://127.0.0.1:{port}/json/list");

    let response = match http.get(&url).timeout(DISCOVERY_TIMEOUT).send().await {
        Ok(response) => response,
        Err(err) => {
            debug!(target: "autopilot.discovery", port, error = %err, "discovery endpoint unreachable");
            return Vec::new();
        }
    };

    match response.json::<Vec<TargetDescriptor>>().await {
        Ok(targets) => targets,
        Err(err) => {
            debug!(target: "autopilot.discovery", port, error = %err, "malformed discovery response");
            Vec::new()
        }
    }
}

/// Fetches the raw, unfiltered discovery response for diagnostics.
pub async fn fetch_raw(http: &reqwest::Client, port: u16) -> Result<Value> {
    let url = format!("http://127.0.0.1:{port}/json/list");
    let response = http
        .get(&url)
        .timeout(DISCOVERY_TIMEOUT)
        .send()
        .await
        .map_err(|e| Error::ConnectionFailed(e.to_string()))?;
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Protocol(e.to_string()))
}

/// Decides whether a discovered target is worth a session.
pub fn is_eligible(target: &TargetDescriptor) -> bool {
    // Without a debugger address there is nothing to attach to.
    let has_ws = target.ws_url.as_deref().is_some_and(|ws| !ws.is_empty());
    if !has_ws {
        return false;
    }

    let url = target.url.to_ascii_lowercase();
    if REJECTED_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        return false;
    }

    let kind = target.kind.as_str();
    if EMBEDDED_KINDS.contains(&kind) {
        return true;
    }
    if kind == "page" {
        return is_workbench(&url, &target.title);
    }

    false
}

/// Substring heuristic for "this page is the main application workbench".
fn is_workbench(url: &str, title: &str) -> bool {
    url.contains("workbench")
        || url.starts_with("vscode-file://")
        || title.to_lowercase().contains("workbench")
}
