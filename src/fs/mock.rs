// src/fs/mock.rs

use super::FileSystem;
use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// In-memory filesystem probe for tests.
///
/// Paths are accessible only once added. Probes can be held open with
/// [`MockFileSystem::hold_probes`] to simulate a slow filesystem; they
/// complete after [`MockFileSystem::release_probes`].
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    accessible: Arc<Mutex<HashSet<PathBuf>>>,
    probed: Arc<Mutex<Vec<PathBuf>>>,
    gate: Arc<watch::Sender<bool>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            accessible: Arc::new(Mutex::new(HashSet::new())),
            probed: Arc::new(Mutex::new(Vec::new())),
            gate: Arc::new(gate),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let mut files = self.accessible.lock().unwrap();
        files.insert(path.as_ref().to_path_buf());
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let mut files = self.accessible.lock().unwrap();
        files.remove(path.as_ref());
    }

    /// Make subsequent (and pending) probes wait until released.
    pub fn hold_probes(&self) {
        self.gate.send_replace(false);
    }

    pub fn release_probes(&self) {
        self.gate.send_replace(true);
    }

    /// Every path passed to `can_access` so far, in call order.
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn can_access<'a>(&'a self, path: &'a Path) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        self.probed.lock().unwrap().push(path.to_path_buf());
        let mut gate = self.gate.subscribe();

        Box::pin(async move {
            // Sender lives in `self`, so the channel cannot close here.
            let _ = gate.wait_for(|open| *open).await;
            self.accessible.lock().unwrap().contains(path)
        })
    }
}
