use anyhow::Context;
use autopilot_runtime::SessionManager;

/// Prints the raw discovery response, unfiltered.
pub async fn targets(port: u16) -> anyhow::Result<()> {
    let manager = SessionManager::new();
    let raw = manager
        .raw_targets(port)
        .await
        .with_context(|| format!("no debug endpoint on port {port}"))?;
    println!("{}", serde_json::to_string_pretty(&raw)?);
    Ok(())
}
