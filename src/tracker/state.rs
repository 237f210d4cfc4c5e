// src/tracker/state.rs

//! Pure tracker state.
//!
//! This holds everything the tracker mutates: the current label, the watch
//! slot, the liveness flag and the resolution sequence counters. It has
//! **no** Tokio types and performs no IO, so the async shell in
//! [`tracker`](super) only has to lock it, call one method and act on the
//! returned outcome.

use crate::types::{BranchLabel, ResolutionOrdering};
use crate::watch::WatchSubscription;

/// Result of offering a finished resolution to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The label now holds the resolved value.
    Applied,
    /// A newer resolution was already applied (`ResolutionOrdering::Latest`).
    Stale,
    /// The tracker was stopped; the result was discarded.
    Unmounted,
}

#[derive(Debug)]
pub struct TrackerState {
    label: BranchLabel,
    watch: Option<Box<dyn WatchSubscription>>,
    mounted: bool,
    ordering: ResolutionOrdering,
    issued: u64,
    applied: u64,
}

impl TrackerState {
    pub fn new(ordering: ResolutionOrdering) -> Self {
        Self {
            label: None,
            watch: None,
            mounted: true,
            ordering,
            issued: 0,
            applied: 0,
        }
    }

    pub fn label(&self) -> &BranchLabel {
        &self.label
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    pub fn ordering(&self) -> ResolutionOrdering {
        self.ordering
    }

    /// Reserve the sequence number for a resolution about to be issued.
    pub fn begin_resolution(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Offer the result of resolution `seq`.
    pub fn apply_resolution(&mut self, seq: u64, label: BranchLabel) -> ResolutionOutcome {
        if !self.mounted {
            return ResolutionOutcome::Unmounted;
        }

        if self.ordering == ResolutionOrdering::Latest && seq <= self.applied {
            return ResolutionOutcome::Stale;
        }

        self.applied = self.applied.max(seq);
        self.label = label;
        ResolutionOutcome::Applied
    }

    /// Attach a freshly registered subscription.
    ///
    /// Hands the subscription back if the tracker was stopped in the
    /// meantime (or one is somehow already attached); the caller must close
    /// it.
    pub fn attach_watch(
        &mut self,
        subscription: Box<dyn WatchSubscription>,
    ) -> Result<(), Box<dyn WatchSubscription>> {
        if !self.mounted || self.watch.is_some() {
            return Err(subscription);
        }
        self.watch = Some(subscription);
        Ok(())
    }

    /// Clear the liveness flag and detach the subscription, if any.
    ///
    /// Only the first call can return a subscription.
    pub fn unmount(&mut self) -> Option<Box<dyn WatchSubscription>> {
        self.mounted = false;
        self.watch.take()
    }
}
