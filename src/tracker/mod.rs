// src/tracker/mod.rs

//! Branch label tracker.
//!
//! [`BranchNameTracker`] reconciles three asynchronous sources into one
//! label:
//! - the label resolution started at startup (and by each change event),
//! - the best-effort watch on `<dir>/.git/logs/HEAD`,
//! - teardown via [`BranchNameTracker::stop`] (or drop).
//!
//! All mutable state lives in a [`TrackerState`] behind a mutex that is
//! never held across an `.await`. Every task re-checks the liveness flag
//! under that lock before acting, so nothing lands after `stop()`.

pub mod builder;
pub mod state;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::exec::ProcessExecutor;
use crate::fs::FileSystem;
use crate::resolve::{head_log_path, resolve_label};
use crate::types::{BranchLabel, WatchEvent};
use crate::watch::FileWatcher;

pub use builder::TrackerBuilder;
pub use state::{ResolutionOutcome, TrackerState};

/// Keeps the current branch label of a directory up to date.
///
/// Created with [`BranchNameTracker::start`] (production collaborators) or
/// [`BranchNameTracker::builder`]. Both must be called from within a Tokio
/// runtime. Dropping the tracker stops it.
pub struct BranchNameTracker {
    inner: Arc<Inner>,
}

struct Inner {
    directory: PathBuf,
    executor: Arc<dyn ProcessExecutor>,
    state: Mutex<TrackerState>,
    label_tx: watch::Sender<BranchLabel>,
}

impl BranchNameTracker {
    /// Start tracking `directory` with the default shell executor, real
    /// filesystem and `notify` watcher.
    pub fn start(directory: impl Into<PathBuf>) -> Self {
        Self::builder(directory).start()
    }

    pub fn builder(directory: impl Into<PathBuf>) -> TrackerBuilder {
        TrackerBuilder::new(directory)
    }

    /// The current label; `None` until the first resolution succeeds.
    pub fn label(&self) -> BranchLabel {
        self.inner.label_tx.borrow().clone()
    }

    /// Receiver notified on every label transition.
    pub fn subscribe(&self) -> watch::Receiver<BranchLabel> {
        self.inner.label_tx.subscribe()
    }

    pub fn directory(&self) -> &Path {
        &self.inner.directory
    }

    /// Whether a watch subscription is currently attached.
    pub fn is_watching(&self) -> bool {
        self.inner.state().is_watching()
    }

    /// Whether the tracker has not been stopped yet.
    pub fn is_running(&self) -> bool {
        self.inner.is_mounted()
    }

    /// Re-resolve the label once, as if the change log had been modified.
    ///
    /// No-op after `stop()`.
    pub fn refresh(&self) {
        spawn_resolution(&self.inner);
    }

    /// Stop tracking and release the watch subscription.
    ///
    /// Idempotent. In-flight git queries are not killed; their results are
    /// discarded when they complete. A watch registration still in flight
    /// is closed as soon as it completes.
    pub fn stop(&self) {
        let (was_mounted, subscription) = {
            let mut state = self.inner.state();
            let was_mounted = state.is_mounted();
            (was_mounted, state.unmount())
        };

        if let Some(subscription) = subscription {
            subscription.close();
        }

        if was_mounted {
            info!(dir = ?self.inner.directory, "branch tracker stopped");
        }
    }
}

impl Drop for BranchNameTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for BranchNameTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchNameTracker")
            .field("directory", &self.inner.directory)
            .field("label", &self.label())
            .field("state", &*self.inner.state())
            .finish()
    }
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, TrackerState> {
        // State transitions are single assignments, so a panicking holder
        // cannot leave it half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_mounted(&self) -> bool {
        self.state().is_mounted()
    }

    /// Apply the outcome of resolution `seq` and publish it.
    ///
    /// Publishing happens under the state lock so the channel never runs
    /// ahead of (or behind) the state.
    fn complete_resolution(&self, seq: u64, label: BranchLabel) {
        let mut state = self.state();

        match state.apply_resolution(seq, label) {
            ResolutionOutcome::Applied => {
                let label = state.label();
                let changed = self.label_tx.send_if_modified(|current| {
                    if *current == *label {
                        false
                    } else {
                        current.clone_from(label);
                        true
                    }
                });
                if changed {
                    info!(dir = ?self.directory, label = ?label, seq, "branch label updated");
                } else {
                    debug!(seq, "branch label unchanged");
                }
            }
            ResolutionOutcome::Stale => {
                debug!(seq, "newer resolution already applied; discarding result");
            }
            ResolutionOutcome::Unmounted => {
                debug!(seq, "tracker stopped; discarding resolution result");
            }
        }
    }
}

/// Issue one resolution unless the tracker is stopped.
///
/// Resolutions are not serialized: overlapping ones complete in whatever
/// order git returns, and the state's ordering policy decides what sticks.
fn spawn_resolution(inner: &Arc<Inner>) {
    let seq = {
        let mut state = inner.state();
        if !state.is_mounted() {
            return;
        }
        state.begin_resolution()
    };

    let inner = Arc::clone(inner);
    tokio::spawn(async move {
        debug!(dir = ?inner.directory, seq, "resolving branch label");
        let label = resolve_label(inner.executor.as_ref(), &inner.directory).await;
        inner.complete_resolution(seq, label);
    });
}

/// Probe for the change log and, if present, subscribe to it.
///
/// Every failure here just leaves the tracker without auto-refresh.
async fn setup_watch(
    inner: Arc<Inner>,
    file_system: Arc<dyn FileSystem>,
    watcher: Arc<dyn FileWatcher>,
) {
    let path = head_log_path(&inner.directory);

    if !file_system.can_access(&path).await {
        debug!(path = ?path, "change log not accessible; auto-refresh disabled");
        return;
    }

    if !inner.is_mounted() {
        debug!(path = ?path, "tracker stopped before watch registration");
        return;
    }

    let (event_tx, event_rx) = mpsc::unbounded_channel::<WatchEvent>();

    let subscription = match watcher.watch(&path, event_tx).await {
        Ok(subscription) => subscription,
        Err(err) => {
            debug!(path = ?path, error = %err, "watch registration failed; auto-refresh disabled");
            return;
        }
    };

    let attached = inner.state().attach_watch(subscription);
    if let Err(subscription) = attached {
        debug!(path = ?path, "tracker stopped during watch registration; releasing subscription");
        subscription.close();
        return;
    }

    debug!(path = ?path, "watching change log");
    tokio::spawn(forward_events(inner, event_rx));
}

/// Turn each change event into a resolution until the subscription is
/// closed (which drops the sender) or the tracker is stopped.
async fn forward_events(inner: Arc<Inner>, mut event_rx: mpsc::UnboundedReceiver<WatchEvent>) {
    while event_rx.recv().await.is_some() {
        if !inner.is_mounted() {
            break;
        }
        debug!(dir = ?inner.directory, "change log modified; re-resolving");
        spawn_resolution(&inner);
    }

    debug!(dir = ?inner.directory, "watch event loop finished");
}
