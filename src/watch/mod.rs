// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Defining the `FileWatcher` / `WatchSubscription` seam the tracker uses.
//! - Wiring up a cross-platform filesystem watcher (`notify`) on a single
//!   file and bridging its callback into the async world.
//!
//! It does **not** know about git or labels; it only turns filesystem
//! changes into [`WatchEvent`](crate::types::WatchEvent)s.

pub mod subscription;
pub mod watcher;

pub use subscription::{FileWatcher, WatchSubscription};
pub use watcher::{NotifySubscription, NotifyWatcher};
