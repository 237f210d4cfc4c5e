// src/watch/subscription.rs

//! Pluggable file watcher abstraction.

use std::fmt::Debug;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::errors::Result;
use crate::types::WatchEvent;

/// An active filesystem subscription.
///
/// Closing consumes the subscription, so a handle can be released at most
/// once. Implementations must stop sending events once closed and drop
/// their clone of the event sender.
pub trait WatchSubscription: Send + Debug {
    fn close(self: Box<Self>);
}

/// Trait abstracting how a single file is watched.
///
/// Production code uses [`NotifyWatcher`](super::NotifyWatcher); tests can
/// provide a fake that records registrations and fires events on demand.
pub trait FileWatcher: Send + Sync + Debug {
    /// Register a subscription on exactly `path`.
    ///
    /// Every change to the path (any kind) sends one [`WatchEvent`] on
    /// `events`. The returned subscription owns the registration.
    fn watch<'a>(
        &'a self,
        path: &'a Path,
        events: mpsc::UnboundedSender<WatchEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn WatchSubscription>>> + Send + 'a>>;
}
