// src/watch/watcher.rs

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::Context;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::types::WatchEvent;

use super::subscription::{FileWatcher, WatchSubscription};

/// Production watcher backed by `notify`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyWatcher;

impl NotifyWatcher {
    pub fn new() -> Self {
        Self
    }
}

/// Subscription handle for a [`NotifyWatcher`] registration.
///
/// Holds the underlying `RecommendedWatcher`; the notify callback (and with
/// it the event sender) lives exactly as long as this handle.
pub struct NotifySubscription {
    watcher: RecommendedWatcher,
    path: PathBuf,
}

impl std::fmt::Debug for NotifySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifySubscription")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl WatchSubscription for NotifySubscription {
    fn close(mut self: Box<Self>) {
        if let Err(err) = self.watcher.unwatch(&self.path) {
            debug!(path = ?self.path, error = %err, "unwatch failed; dropping watcher anyway");
        }
        info!("file watcher stopped on {:?}", self.path);
    }
}

impl FileWatcher for NotifyWatcher {
    fn watch<'a>(
        &'a self,
        path: &'a Path,
        events: mpsc::UnboundedSender<WatchEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn WatchSubscription>>> + Send + 'a>> {
        let path = path.to_path_buf();

        Box::pin(async move {
            // Creating the watcher talks to the OS; keep it off the runtime threads.
            let subscription = tokio::task::spawn_blocking(move || register(path, events))
                .await
                .context("joining watcher registration task")??;

            Ok(Box::new(subscription) as Box<dyn WatchSubscription>)
        })
    }
}

fn register(
    path: PathBuf,
    events: mpsc::UnboundedSender<WatchEvent>,
) -> Result<NotifySubscription> {
    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                debug!(?event, "received notify event");
                // Receiver gone means the tracker is shutting down.
                let _ = events.send(WatchEvent);
            }
            Err(err) => {
                warn!(error = %err, "file watch error");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;

    info!("file watcher started on {:?}", path);

    Ok(NotifySubscription { watcher, path })
}
