#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use branchwatch::fs::mock::MockFileSystem;
use branchwatch::resolve::head_log_path;
use branchwatch::types::ResolutionOrdering;
use branchwatch::BranchNameTracker;
use branchwatch_test_utils::{FakeExecutor, FakeWatcher};

pub use branchwatch_test_utils::{eventually, init_tracing, settle, with_timeout};

pub const REPO: &str = "/repo";

/// Fakes for all three collaborators, wired to a tracker on [`REPO`].
pub struct Harness {
    pub dir: PathBuf,
    pub executor: Arc<FakeExecutor>,
    pub fs: MockFileSystem,
    pub watcher: FakeWatcher,
    pub ordering: ResolutionOrdering,
}

impl Harness {
    /// Repository at `/repo` whose change log exists.
    pub fn new() -> Self {
        init_tracing();
        let dir = PathBuf::from(REPO);
        let fs = MockFileSystem::new();
        fs.add_file(head_log_path(&dir));

        Self {
            dir,
            executor: Arc::new(FakeExecutor::new()),
            fs,
            watcher: FakeWatcher::new(),
            ordering: ResolutionOrdering::Completion,
        }
    }

    /// Directory without `.git/logs/HEAD`: the probe rejects.
    pub fn without_change_log() -> Self {
        let h = Self::new();
        h.fs.remove_file(head_log_path(&h.dir));
        h
    }

    pub fn ordering(mut self, ordering: ResolutionOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn start(&self) -> BranchNameTracker {
        BranchNameTracker::builder(&self.dir)
            .executor(self.executor.clone())
            .file_system(Arc::new(self.fs.clone()))
            .watcher(Arc::new(self.watcher.clone()))
            .ordering(self.ordering)
            .start()
    }

    pub fn change_log(&self) -> PathBuf {
        head_log_path(&self.dir)
    }
}

pub async fn wait_for_label(tracker: &BranchNameTracker, expected: Option<&str>) {
    eventually(|| tracker.label().as_deref() == expected).await;
}

pub async fn wait_for_watch(tracker: &BranchNameTracker) {
    eventually(|| tracker.is_watching()).await;
}
