//! The session set and its best-effort batch operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::discovery;
use crate::error::Result;
use crate::session::Session;

/// Owns every live session, keyed by `"{port}:{target_id}"`.
///
/// The map is the only shared mutable state in the runtime; sessions remove
/// themselves from it when their connection dies. A `BTreeMap` keeps batch
/// results in a stable session order.
pub struct SessionManager {
    http: reqwest::Client,
    sessions: Arc<Mutex<BTreeMap<String, Arc<Session>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            sessions: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Runs one discovery pass and connects every eligible target that does
    /// not already have a session. Never fails: discovery problems mean
    /// "zero targets" and individual connect failures are skipped. Returns
    /// the total connected-session count afterwards.
    pub async fn scan_and_connect(&self, port: u16) -> usize {
        let targets = discovery::list_targets(&self.http, port).await;

        for target in targets.iter().filter(|t| discovery::is_eligible(t)) {
            let key = format!("{port}:{}", target.id);
            if self.sessions.lock().contains_key(&key) {
                continue;
            }

            let sessions = Arc::clone(&self.sessions);
            let removal_key = key.clone();
            let on_close = move || {
                sessions.lock().remove(&removal_key);
            };

            match Session::connect(key.clone(), target, on_close).await {
                Ok(session) => {
                    debug!(
                        target: "autopilot.session",
                        key = %key,
                        url = %target.url,
                        kind = %target.kind,
                        "attached session"
                    );
                    self.sessions.lock().insert(key, session);
                }
                Err(err) => {
                    debug!(target: "autopilot.session", key = %key, error = %err, "connect failed");
                }
            }
        }

        self.session_count()
    }

    /// Number of currently-connected sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Fans `expression` out to every session in parallel.
    ///
    /// Per-session failures (timeout, protocol error, script exception) are
    /// logged and yield `None`, so one bad session never fails the batch.
    /// Results come back as `(key, value)` pairs in session order.
    pub async fn evaluate_all(&self, expression: &str) -> Vec<(String, Option<Value>)> {
        let sessions: Vec<(String, Arc<Session>)> = self
            .sessions
            .lock()
            .iter()
            .map(|(key, session)| (key.clone(), Arc::clone(session)))
            .collect();

        let calls = sessions.into_iter().map(|(key, session)| async move {
            match session.evaluate(expression).await {
                Ok(value) => (key, Some(value)),
                Err(err) => {
                    debug!(target: "autopilot.session", key = %key, error = %err, "evaluate failed");
                    (key, None)
                }
            }
        });

        join_all(calls).await
    }

    /// Closes every session and clears the set.
    pub async fn disconnect_all(&self) {
        let drained: Vec<Arc<Session>> = {
            let mut sessions = self.sessions.lock();
            let drained = sessions.values().cloned().collect();
            sessions.clear();
            drained
        };
        for session in drained {
            session.close().await;
        }
    }

    /// Raw discovery response for the diagnostics surface.
    pub async fn raw_targets(&self, port: u16) -> Result<Value> {
        discovery::fetch_raw(&self.http, port).await
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
