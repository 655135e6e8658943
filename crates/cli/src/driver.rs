//! The polling loop that drives everything.
//!
//! Enabled, the driver runs two timers: a fast poll that pushes the scan
//! payload into every session (or fires the command-API fallback when no
//! session exists), and a slow reconnect that re-runs discovery to pick up
//! new and recovered targets. A pass that outlives its interval is never
//! overlapped; the next tick is skipped instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use autopilot_runtime::SessionManager;
use autopilot_scanner::{ClickReport, scan_script};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::click_log::ClickLog;
use crate::host::{ACCEPT_COMMANDS, HostCommands};

/// Interval between scan passes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Interval between rediscovery passes.
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

pub struct PollDriver {
    inner: Arc<Inner>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

struct Inner {
    manager: SessionManager,
    host: Arc<dyn HostCommands>,
    port: u16,
    click_log: Option<ClickLog>,
    enabled: AtomicBool,
    in_flight: AtomicBool,
}

impl PollDriver {
    pub fn new(
        manager: SessionManager,
        port: u16,
        click_log: Option<ClickLog>,
        host: Arc<dyn HostCommands>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                manager,
                host,
                port,
                click_log,
                enabled: AtomicBool::new(false),
                in_flight: AtomicBool::new(false),
            }),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    /// Connects immediately, then starts the poll and reconnect timers.
    /// Enabling an enabled driver is a no-op.
    pub async fn enable(&self) {
        if self.inner.enabled.swap(true, Ordering::SeqCst) {
            return;
        }

        let count = self.inner.manager.scan_and_connect(self.inner.port).await;
        info!(
            target: "autopilot.driver",
            port = self.inner.port,
            sessions = count,
            "autopilot enabled"
        );

        let poll = {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(POLL_INTERVAL);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    inner.tick().await;
                }
            })
        };

        let reconnect = {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(RECONNECT_INTERVAL);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker.tick().await;
                let mut last = inner.manager.session_count();
                loop {
                    ticker.tick().await;
                    let count = inner.manager.scan_and_connect(inner.port).await;
                    if count != last {
                        info!(target: "autopilot.driver", sessions = count, "session count changed");
                        last = count;
                    }
                }
            })
        };

        *self.tasks.lock() = vec![poll, reconnect];
    }

    /// Stops both timers and drops every session. Disabling a disabled
    /// driver is a no-op.
    pub async fn disable(&self) {
        if !self.inner.enabled.swap(false, Ordering::SeqCst) {
            return;
        }
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        // Aborting the poll task can kill a pass at an await point before it
        // clears the guard; reset it here or re-enable would skip every tick.
        self.inner.in_flight.store(false, Ordering::SeqCst);
        self.inner.manager.disconnect_all().await;
        info!(target: "autopilot.driver", "autopilot disabled");
    }
}

impl Inner {
    /// One guarded pass. If the previous pass is still running (a slow
    /// target holding `evaluate` at its timeout), skip instead of stacking.
    async fn tick(&self) {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!(target: "autopilot.driver", "previous pass still running; tick skipped");
            return;
        }
        self.run_pass().await;
        self.in_flight.store(false, Ordering::SeqCst);
    }

    async fn run_pass(&self) {
        if self.manager.session_count() == 0 {
            self.run_fallback().await;
            return;
        }

        let script = scan_script();
        for (key, value) in self.manager.evaluate_all(&script).await {
            let Some(value) = value else { continue };
            if value.is_null() {
                continue;
            }
            match serde_json::from_value::<ClickReport>(value) {
                Ok(report) => {
                    info!(
                        target: "autopilot.click",
                        session = %key,
                        tag = %report.tag,
                        text = %report.text,
                        score = report.score,
                        "accepted suggestion"
                    );
                    if let Some(log) = &self.click_log {
                        if let Err(err) = log.append(&key, &report) {
                            warn!(target: "autopilot.driver", error = %err, "click log write failed");
                        }
                    }
                }
                Err(err) => {
                    debug!(target: "autopilot.driver", session = %key, error = %err, "unparseable scan result");
                }
            }
        }
    }

    /// Without a session the DOM is out of reach; blind-fire the editor's
    /// accept commands instead. Any of them may not exist in a given editor
    /// build, so failures only get a debug line.
    async fn run_fallback(&self) {
        for command in ACCEPT_COMMANDS {
            if let Err(err) = self.host.execute(command).await {
                debug!(target: "autopilot.driver", command, error = %err, "host command unavailable");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingHost {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingHost {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl HostCommands for RecordingHost {
        async fn execute(&self, command: &str) -> anyhow::Result<()> {
            self.calls.lock().push(command.to_string());
            Ok(())
        }
    }

    fn driver_with(host: Arc<RecordingHost>) -> PollDriver {
        // A port nobody listens on; sessions stay at zero.
        PollDriver::new(SessionManager::new(), 1, None, host)
    }

    #[tokio::test]
    async fn enable_disable_round_trip() {
        let driver = driver_with(RecordingHost::new());
        assert!(!driver.is_enabled());

        driver.enable().await;
        assert!(driver.is_enabled());
        driver.enable().await;
        assert_eq!(driver.tasks.lock().len(), 2);

        driver.disable().await;
        assert!(!driver.is_enabled());
        assert!(driver.tasks.lock().is_empty());
        driver.disable().await;
    }

    #[tokio::test]
    async fn fallback_fires_accept_commands_in_order() {
        let host = RecordingHost::new();
        let driver = driver_with(Arc::clone(&host));

        driver.inner.tick().await;

        let calls = host.calls.lock();
        assert_eq!(calls.as_slice(), ACCEPT_COMMANDS);
    }

    /// A host bridge that never resolves, parking any pass that reaches it.
    struct HangingHost;

    #[async_trait::async_trait]
    impl HostCommands for HangingHost {
        async fn execute(&self, _command: &str) -> anyhow::Result<()> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn disable_mid_pass_clears_the_inflight_guard() {
        let driver = PollDriver::new(SessionManager::new(), 1, None, Arc::new(HangingHost));
        driver.enable().await;

        // Park a pass on the hanging host command, then kill it the way
        // disable() kills the poll task: aborted at its await point.
        let inner = Arc::clone(&driver.inner);
        let pass = tokio::spawn(async move { inner.tick().await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(driver.inner.in_flight.load(Ordering::SeqCst));
        pass.abort();

        driver.disable().await;
        assert!(!driver.inner.in_flight.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn reenable_after_midpass_disable_resumes_ticking() {
        let host = RecordingHost::new();
        let driver = driver_with(Arc::clone(&host));

        driver.enable().await;
        // A pass aborted at an await point leaves the guard set.
        driver.inner.in_flight.store(true, Ordering::SeqCst);
        driver.disable().await;

        driver.enable().await;
        driver.inner.tick().await;
        assert_eq!(host.calls.lock().len(), ACCEPT_COMMANDS.len());
        driver.disable().await;
    }

    #[tokio::test]
    async fn overlapping_tick_is_skipped() {
        let host = RecordingHost::new();
        let driver = driver_with(Arc::clone(&host));

        driver.inner.in_flight.store(true, Ordering::SeqCst);
        driver.inner.tick().await;
        assert!(host.calls.lock().is_empty());

        driver.inner.in_flight.store(false, Ordering::SeqCst);
        driver.inner.tick().await;
        assert_eq!(host.calls.lock().len(), ACCEPT_COMMANDS.len());
    }
}
