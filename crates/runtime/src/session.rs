//! One live debug session against a single target.
//!
//! A session owns the WebSocket connection plus the correlation state for
//! in-flight `Runtime.evaluate` calls: each call takes a unique ascending
//! request id and a oneshot callback, and the reader task routes every
//! response to exactly the caller that sent the matching id. Concurrent
//! calls on the same session can therefore never cross-deliver.
//!
//! When the connection closes or errors, the reader fails all pending calls,
//! flags the session closed, and fires the owner's removal callback. The
//! session never reconnects itself; rediscovery is the caller's job.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use autopilot_protocol::{EvaluateRequest, EvaluateReturn, Message, TargetDescriptor};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex as TokioMutex, oneshot};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use crate::error::{Error, Result};

/// Hard ceiling on a script-evaluation round-trip.
pub const EVALUATE_TIMEOUT: Duration = Duration::from_secs(2);

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Pending evaluate callbacks keyed by request id.
type CallbackMap = Arc<TokioMutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

/// A connected debug session.
pub struct Session {
    key: String,
    url: String,
    title: String,
    next_id: AtomicU64,
    callbacks: CallbackMap,
    writer: TokioMutex<WsSink>,
    closed: Arc<AtomicBool>,
}

impl Session {
    /// Opens a WebSocket connection to `target` and starts the reader task.
    ///
    /// `on_close` fires exactly once, when the connection ends for any
    /// reason; owners use it to drop the session from their set.
    pub async fn connect(
        key: String,
        target: &TargetDescriptor,
        on_close: impl FnOnce() + Send + 'static,
    ) -> Result<Arc<Self>> {
        let ws_url = target
            .ws_url
            .as_deref()
            .filter(|ws| !ws.is_empty())
            .ok_or_else(|| Error::ConnectionFailed("target has no debugger address".into()))?;

        let (stream, _) = connect_async(ws_url)
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;
        let (sink, source) = stream.split();

        let session = Arc::new(Self {
            key,
            url: target.url.clone(),
            title: target.title.clone(),
            next_id: AtomicU64::new(1),
            callbacks: Arc::new(TokioMutex::new(HashMap::new())),
            writer: TokioMutex::new(sink),
            closed: Arc::new(AtomicBool::new(false)),
        });
        session.spawn_reader(source, on_close);
        Ok(session)
    }

    fn spawn_reader(
        self: &Arc<Self>,
        mut source: WsSource,
        on_close: impl FnOnce() + Send + 'static,
    ) {
        let callbacks = Arc::clone(&self.callbacks);
        let closed = Arc::clone(&self.closed);
        let key = self.key.clone();

        tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(WsMessage::Text(text)) => dispatch(&callbacks, &text).await,
                    Ok(WsMessage::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        debug!(target: "autopilot.session", key = %key, error = %err, "connection error");
                        break;
                    }
                }
            }

            closed.store(true, Ordering::SeqCst);
            let mut pending = callbacks.lock().await;
            for (_, tx) in pending.drain() {
                let _ = tx.send(Err(Error::SessionClosed));
            }
            drop(pending);
            debug!(target: "autopilot.session", key = %key, "session closed");
            on_close();
        });
    }

    /// Session identifier, `"{port}:{target_id}"`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// URL of the attached target at discovery time.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Title of the attached target at discovery time.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Evaluates `expression` in the target and returns its value.
    ///
    /// Rejects with [`Error::Timeout`] after [`EVALUATE_TIMEOUT`] but leaves
    /// the session open; a late response for the abandoned id is dropped by
    /// the reader as stale. Script exceptions and protocol errors surface as
    /// errors without affecting the connection.
    pub async fn evaluate(&self, expression: &str) -> Result<Value> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.callbacks.lock().await.insert(id, tx);

        let request = EvaluateRequest::new(id, expression);
        let frame = serde_json::to_string(&request)?;
        {
            let mut writer = self.writer.lock().await;
            if let Err(err) = writer.send(WsMessage::Text(frame)).await {
                self.callbacks.lock().await.remove(&id);
                return Err(Error::Transport(err.to_string()));
            }
        }

        let raw = match tokio::time::timeout(EVALUATE_TIMEOUT, rx).await {
            Ok(Ok(result)) => result?,
            Ok(Err(_)) => return Err(Error::SessionClosed),
            Err(_) => {
                self.callbacks.lock().await.remove(&id);
                return Err(Error::Timeout(format!(
                    "no evaluate response within {}ms",
                    EVALUATE_TIMEOUT.as_millis()
                )));
            }
        };

        unwrap_evaluate(raw)
    }

    /// Sends a close frame; the reader task handles the actual teardown.
    pub async fn close(&self) {
        let mut writer = self.writer.lock().await;
        let _ = writer.send(WsMessage::Close(None)).await;
    }
}

/// Routes one inbound frame. Responses go to their pending caller; events
/// and unknown frames are ignored.
async fn dispatch(callbacks: &CallbackMap, text: &str) {
    match serde_json::from_str::<Message>(text) {
        Ok(Message::Response(response)) => {
            let Some(tx) = callbacks.lock().await.remove(&response.id) else {
                debug!(target: "autopilot.session", id = response.id, "stale response dropped");
                return;
            };
            let result = match response.error {
                Some(err) => Err(Error::Protocol(err.message)),
                None => Ok(response.result.unwrap_or(Value::Null)),
            };
            let _ = tx.send(result);
        }
        Ok(Message::Event(_)) | Ok(Message::Unknown(_)) => {}
        Err(err) => {
            debug!(target: "autopilot.session", error = %err, "unparseable frame");
        }
    }
}

/// Unwraps the `Runtime.evaluate` payload: a script exception becomes an
/// error, otherwise the mirrored value (or null for undefined) is returned.
fn unwrap_evaluate(raw: Value) -> Result<Value> {
    let ret: EvaluateReturn = serde_json::from_value(raw)?;
    if let Some(details) = ret.exception_details {
        return Err(Error::ScriptException(details.message().to_string()));
    }
    Ok(ret.result.value.unwrap_or(Value::Null))
}
