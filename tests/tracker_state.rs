// tests/tracker_state.rs

use std::sync::{Arc, Mutex};

use branchwatch::tracker::{ResolutionOutcome, TrackerState};
use branchwatch::types::ResolutionOrdering;
use branchwatch::watch::WatchSubscription;

#[derive(Debug)]
struct CountingSubscription {
    closes: Arc<Mutex<usize>>,
}

impl WatchSubscription for CountingSubscription {
    fn close(self: Box<Self>) {
        *self.closes.lock().unwrap() += 1;
    }
}

fn subscription() -> (Box<dyn WatchSubscription>, Arc<Mutex<usize>>) {
    let closes = Arc::new(Mutex::new(0));
    let sub = Box::new(CountingSubscription {
        closes: Arc::clone(&closes),
    });
    (sub, closes)
}

#[test]
fn new_state_is_mounted_unknown_and_unwatched() {
    let state = TrackerState::new(ResolutionOrdering::default());

    assert!(state.is_mounted());
    assert!(!state.is_watching());
    assert_eq!(state.label(), &None);
    assert_eq!(state.ordering(), ResolutionOrdering::Completion);
}

#[test]
fn resolutions_apply_in_completion_order_by_default() {
    let mut state = TrackerState::new(ResolutionOrdering::Completion);
    let first = state.begin_resolution();
    let second = state.begin_resolution();
    assert!(second > first);

    assert_eq!(
        state.apply_resolution(second, Some("develop".into())),
        ResolutionOutcome::Applied
    );
    assert_eq!(
        state.apply_resolution(first, Some("main".into())),
        ResolutionOutcome::Applied
    );
    assert_eq!(state.label().as_deref(), Some("main"));
}

#[test]
fn latest_ordering_rejects_older_sequence_numbers() {
    let mut state = TrackerState::new(ResolutionOrdering::Latest);
    let first = state.begin_resolution();
    let second = state.begin_resolution();

    assert_eq!(
        state.apply_resolution(second, Some("develop".into())),
        ResolutionOutcome::Applied
    );
    assert_eq!(
        state.apply_resolution(first, Some("main".into())),
        ResolutionOutcome::Stale
    );
    assert_eq!(state.label().as_deref(), Some("develop"));
}

#[test]
fn absent_result_replaces_known_label() {
    let mut state = TrackerState::new(ResolutionOrdering::Completion);
    let a = state.begin_resolution();
    state.apply_resolution(a, Some("main".into()));
    let b = state.begin_resolution();

    assert_eq!(state.apply_resolution(b, None), ResolutionOutcome::Applied);
    assert_eq!(state.label(), &None);
}

#[test]
fn unmounted_state_discards_results() {
    let mut state = TrackerState::new(ResolutionOrdering::Completion);
    let seq = state.begin_resolution();
    assert!(state.unmount().is_none());

    assert_eq!(
        state.apply_resolution(seq, Some("main".into())),
        ResolutionOutcome::Unmounted
    );
    assert_eq!(state.label(), &None);
}

#[test]
fn unmount_hands_out_subscription_once() {
    let mut state = TrackerState::new(ResolutionOrdering::Completion);
    let (sub, closes) = subscription();
    state.attach_watch(sub).unwrap();
    assert!(state.is_watching());

    let taken = state.unmount();
    assert!(taken.is_some());
    assert!(state.unmount().is_none());
    assert!(!state.is_watching());

    taken.unwrap().close();
    assert_eq!(*closes.lock().unwrap(), 1);
}

#[test]
fn attach_after_unmount_is_refused() {
    let mut state = TrackerState::new(ResolutionOrdering::Completion);
    state.unmount();

    let (sub, closes) = subscription();
    let refused = state.attach_watch(sub).unwrap_err();
    assert!(!state.is_watching());

    refused.close();
    assert_eq!(*closes.lock().unwrap(), 1);
}

#[test]
fn second_attach_is_refused() {
    let mut state = TrackerState::new(ResolutionOrdering::Completion);
    let (first, _) = subscription();
    let (second, _) = subscription();

    state.attach_watch(first).unwrap();
    assert!(state.attach_watch(second).is_err());
}
