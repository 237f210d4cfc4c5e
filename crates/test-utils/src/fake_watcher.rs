use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use tokio::sync::mpsc;

use branchwatch::errors::{BranchwatchError, Result};
use branchwatch::types::WatchEvent;
use branchwatch::watch::{FileWatcher, WatchSubscription};

use crate::Gate;

#[derive(Debug, Default)]
struct Shared {
    registrations: Vec<PathBuf>,
    active: HashMap<u64, mpsc::UnboundedSender<WatchEvent>>,
    next_id: u64,
    closes: usize,
    fail: bool,
    hold: Option<Gate>,
}

/// A fake file watcher that:
/// - records every registration request (path) at call time
/// - hands out subscriptions whose `close()` is counted
/// - lets the test fire change events on all active subscriptions.
#[derive(Debug, Clone, Default)]
pub struct FakeWatcher {
    shared: Arc<Mutex<Shared>>,
}

/// Subscription handed out by [`FakeWatcher`].
#[derive(Debug)]
pub struct FakeSubscription {
    id: u64,
    shared: Arc<Mutex<Shared>>,
}

impl FakeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make future registrations fail.
    pub fn fail_registrations(&self) {
        self.shared.lock().unwrap().fail = true;
    }

    /// Keep the next registration in flight until the returned gate opens.
    pub fn hold_next_registration(&self) -> Gate {
        let gate = Gate::new();
        self.shared.lock().unwrap().hold = Some(gate.clone());
        gate
    }

    /// Send one change event to every active subscription.
    ///
    /// Returns how many subscriptions received it.
    pub fn fire(&self) -> usize {
        let shared = self.shared.lock().unwrap();
        shared
            .active
            .values()
            .filter(|tx| tx.send(WatchEvent).is_ok())
            .count()
    }

    pub fn registrations(&self) -> Vec<PathBuf> {
        self.shared.lock().unwrap().registrations.clone()
    }

    pub fn registration_count(&self) -> usize {
        self.shared.lock().unwrap().registrations.len()
    }

    pub fn close_count(&self) -> usize {
        self.shared.lock().unwrap().closes
    }

    pub fn active_count(&self) -> usize {
        self.shared.lock().unwrap().active.len()
    }
}

impl WatchSubscription for FakeSubscription {
    fn close(self: Box<Self>) {
        let mut shared = self.shared.lock().unwrap();
        shared.closes += 1;
        // Dropping the sender ends the tracker's event loop.
        shared.active.remove(&self.id);
    }
}

impl FileWatcher for FakeWatcher {
    fn watch<'a>(
        &'a self,
        path: &'a Path,
        events: mpsc::UnboundedSender<WatchEvent>,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn WatchSubscription>>> + Send + 'a>> {
        let hold = {
            let mut shared = self.shared.lock().unwrap();
            shared.registrations.push(path.to_path_buf());
            shared.hold.take()
        };

        Box::pin(async move {
            if let Some(gate) = hold {
                gate.wait().await;
            }

            let mut shared = self.shared.lock().unwrap();
            if shared.fail {
                return Err(BranchwatchError::Other(anyhow!(
                    "scripted watch failure for {:?}",
                    path
                )));
            }

            let id = shared.next_id;
            shared.next_id += 1;
            shared.active.insert(id, events);

            Ok(Box::new(FakeSubscription {
                id,
                shared: Arc::clone(&self.shared),
            }) as Box<dyn WatchSubscription>)
        })
    }
}
