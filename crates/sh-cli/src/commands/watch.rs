//! Watch command: keep the registry fresh and report reloads

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use sh_runner::{run_reload_loop, NotifyWatcher, SshHelper};

use crate::output::{print_info, print_success};

/// Execute the watch command until Ctrl-C
pub async fn watch_command(helper: Arc<SshHelper>) -> Result<()> {
    let (watcher, events) = NotifyWatcher::new().context("Failed to start file watcher")?;

    let count = helper.reload();
    print_info(&format!("{} targets, watching for changes (Ctrl-C to stop)", count));

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    run_reload_loop(helper, watcher, events, cancel, |count| {
        print_success(&format!("Reloaded: {} targets", count));
    })
    .await;

    Ok(())
}
