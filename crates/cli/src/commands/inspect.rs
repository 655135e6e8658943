use autopilot_runtime::SessionManager;
use autopilot_scanner::inspect_script;

/// One diagnostic pass: attach, dump every accept-like candidate each
/// target can see, detach. Nothing is clicked.
pub async fn inspect(port: u16) -> anyhow::Result<()> {
    let manager = SessionManager::new();
    let count = manager.scan_and_connect(port).await;
    if count == 0 {
        println!("no debug targets attached on port {port}");
        return Ok(());
    }

    let script = inspect_script();
    for (key, value) in manager.evaluate_all(&script).await {
        println!("== {key}");
        match value {
            Some(candidates) => println!("{}", serde_json::to_string_pretty(&candidates)?),
            None => println!("(no response)"),
        }
    }

    manager.disconnect_all().await;
    Ok(())
}
