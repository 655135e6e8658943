use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use autopilot_runtime::SessionManager;
use tracing::info;

use crate::click_log::ClickLog;
use crate::driver::PollDriver;
use crate::host::UnavailableHostCommands;

/// Attaches to the editor and keeps accepting until Ctrl-C.
pub async fn run(port: u16, click_log: Option<PathBuf>) -> anyhow::Result<()> {
    let driver = PollDriver::new(
        SessionManager::new(),
        port,
        click_log.map(ClickLog::new),
        Arc::new(UnavailableHostCommands),
    );

    driver.enable().await;
    info!(target: "autopilot", "running; press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    driver.disable().await;
    Ok(())
}
