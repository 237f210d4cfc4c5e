// src/tracker/builder.rs

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::info;

use crate::exec::{ProcessExecutor, ShellExecutor};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::ResolutionOrdering;
use crate::watch::{FileWatcher, NotifyWatcher};

use super::{BranchNameTracker, Inner, TrackerState, setup_watch, spawn_resolution};

/// Configures and starts a [`BranchNameTracker`].
///
/// Every collaborator defaults to its production implementation; tests
/// substitute fakes.
pub struct TrackerBuilder {
    directory: PathBuf,
    executor: Arc<dyn ProcessExecutor>,
    file_system: Arc<dyn FileSystem>,
    watcher: Arc<dyn FileWatcher>,
    ordering: ResolutionOrdering,
    auto_refresh: bool,
}

impl TrackerBuilder {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            executor: Arc::new(ShellExecutor::new()),
            file_system: Arc::new(RealFileSystem),
            watcher: Arc::new(NotifyWatcher::new()),
            ordering: ResolutionOrdering::default(),
            auto_refresh: true,
        }
    }

    pub fn executor(mut self, executor: Arc<dyn ProcessExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = file_system;
        self
    }

    pub fn watcher(mut self, watcher: Arc<dyn FileWatcher>) -> Self {
        self.watcher = watcher;
        self
    }

    pub fn ordering(mut self, ordering: ResolutionOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Whether to watch the change log at all. Without it the label is
    /// resolved once (plus on explicit `refresh()`).
    pub fn auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh = enabled;
        self
    }

    /// Start the tracker: kicks off the first resolution and, concurrently,
    /// the watch setup.
    pub fn start(self) -> BranchNameTracker {
        let (label_tx, _) = watch::channel(None);

        let inner = Arc::new(Inner {
            directory: self.directory,
            executor: self.executor,
            state: Mutex::new(TrackerState::new(self.ordering)),
            label_tx,
        });

        info!(
            dir = ?inner.directory,
            ordering = ?self.ordering,
            auto_refresh = self.auto_refresh,
            "branch tracker started"
        );

        spawn_resolution(&inner);

        if self.auto_refresh {
            tokio::spawn(setup_watch(
                Arc::clone(&inner),
                self.file_system,
                self.watcher,
            ));
        }

        BranchNameTracker { inner }
    }
}
