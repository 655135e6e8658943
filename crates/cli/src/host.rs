//! Editor command-API fallback.
//!
//! When no debug target is attached there is no DOM to scan, but the editor
//! may still expose accept actions through its command surface. The trait is
//! the seam for that bridge; the shipped implementation reports the bridge
//! as unavailable, and the driver treats every failure as a no-op.

use anyhow::bail;
use async_trait::async_trait;

/// Accept-style commands fired blindly during a fallback pass, in order.
/// Unknown ids are expected; failures are ignored.
pub const ACCEPT_COMMANDS: &[&str] = &[
    "chatEditor.action.accept",
    "chatEditing.acceptAllFiles",
    "inlineChat.acceptChanges",
    "interactive.acceptChanges",
    "editor.action.inlineSuggest.commit",
    "notebook.cell.acceptChanges",
];

/// Executes editor commands by id.
#[async_trait]
pub trait HostCommands: Send + Sync {
    async fn execute(&self, command: &str) -> anyhow::Result<()>;
}

/// Placeholder bridge for builds without an editor-side command channel.
pub struct UnavailableHostCommands;

#[async_trait]
impl HostCommands for UnavailableHostCommands {
    async fn execute(&self, command: &str) -> anyhow::Result<()> {
        bail!("no host command bridge available for '{command}'")
    }
}
