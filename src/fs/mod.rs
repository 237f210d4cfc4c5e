// src/fs/mod.rs

use std::fmt::Debug;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use tracing::debug;

pub mod mock;

/// Abstract filesystem probe.
///
/// The tracker only needs to know whether the file it wants to watch is
/// there before registering a subscription on it.
pub trait FileSystem: Send + Sync + Debug {
    /// Resolve to `true` if `path` exists and its metadata can be read.
    fn can_access<'a>(&'a self, path: &'a Path) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;
}

/// Implementation that uses `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn can_access<'a>(&'a self, path: &'a Path) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            match tokio::fs::metadata(path).await {
                Ok(_) => true,
                Err(err) => {
                    debug!(path = ?path, error = %err, "path not accessible");
                    false
                }
            }
        })
    }
}
