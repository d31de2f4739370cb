//! Filesystem watching and the debounced reload loop

use std::path::PathBuf;
use std::sync::Arc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::runner::SshHelper;

/// Something that can be pointed at a set of paths
pub trait PathWatcher: Send {
    /// Replace the watched set with `paths`
    fn resubscribe(&mut self, paths: &[PathBuf]);
}

/// [`PathWatcher`] backed by the platform's native notification API.
///
/// Every relevant event is forwarded as a unit message on the channel
/// returned by [`NotifyWatcher::new`].
pub struct NotifyWatcher {
    watcher: RecommendedWatcher,
    watched: Vec<PathBuf>,
}

impl NotifyWatcher {
    pub fn new() -> notify::Result<(Self, mpsc::UnboundedReceiver<()>)> {
        let (tx, rx) = mpsc::unbounded_channel();

        let watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) if is_relevant(&event) => {
                    let _ = tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("File watcher error: {}", e),
            }
        })?;

        Ok((
            Self {
                watcher,
                watched: Vec::new(),
            },
            rx,
        ))
    }
}

impl PathWatcher for NotifyWatcher {
    fn resubscribe(&mut self, paths: &[PathBuf]) {
        for path in self.watched.drain(..) {
            let _ = self.watcher.unwatch(&path);
        }

        for path in paths {
            match self.watcher.watch(path, RecursiveMode::NonRecursive) {
                Ok(()) => self.watched.push(path.clone()),
                Err(e) => tracing::warn!("Failed to watch {:?}: {}", path, e),
            }
        }

        tracing::debug!("Watching {:?}", self.watched);
    }
}

/// Reads don't change anything
fn is_relevant(event: &Event) -> bool {
    !matches!(event.kind, EventKind::Access(_))
}

/// Turn change events into debounced reloads until cancelled.
///
/// Every event restarts the debounce window. When it expires the helper
/// reloads, the watcher is re-pointed at whatever paths exist now, and
/// `on_reload` receives the new target count.
pub async fn run_reload_loop<W, F>(
    helper: Arc<SshHelper>,
    mut watcher: W,
    mut events: mpsc::UnboundedReceiver<()>,
    cancel: CancellationToken,
    mut on_reload: F,
) where
    W: PathWatcher,
    F: FnMut(usize) + Send,
{
    watcher.resubscribe(&helper.watch_paths());
    tracing::info!("Watching for host changes");

    loop {
        let deadline = helper.reload_deadline();

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reload loop shutting down");
                break;
            }
            event = events.recv() => {
                match event {
                    Some(()) => helper.notify_changed(),
                    None => {
                        tracing::debug!("Watcher channel closed, stopping reload loop");
                        break;
                    }
                }
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                // Reverse lookups block, so the reload runs off the async worker
                let now = Instant::now();
                let reloading = helper.clone();
                match tokio::task::spawn_blocking(move || reloading.reload_if_due(now)).await {
                    Ok(Some(count)) => {
                        watcher.resubscribe(&helper.watch_paths());
                        on_reload(count);
                    }
                    Ok(None) => {}
                    Err(e) => tracing::error!("Reload task failed: {}", e),
                }
            }
        }
    }
}
