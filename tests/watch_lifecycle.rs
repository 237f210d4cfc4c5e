// tests/watch_lifecycle.rs

mod common;
use crate::common::{eventually, settle, wait_for_label, wait_for_watch, Harness};

use branchwatch::resolve::{ABBREV_REF_COMMAND, SHORT_HASH_COMMAND};
use branchwatch::BranchNameTracker;

#[tokio::test]
async fn watch_is_registered_on_the_change_log() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    wait_for_watch(&tracker).await;

    assert_eq!(h.fs.probed_paths(), vec![h.change_log()]);
    assert_eq!(h.watcher.registrations(), vec![h.change_log()]);
    assert_eq!(
        h.change_log(),
        std::path::PathBuf::from("/repo/.git/logs/HEAD")
    );
}

#[tokio::test]
async fn change_event_updates_label() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    let mut labels = tracker.subscribe();
    wait_for_label(&tracker, Some("main")).await;
    wait_for_watch(&tracker).await;

    h.executor.succeed(ABBREV_REF_COMMAND, "develop\n");
    assert_eq!(h.watcher.fire(), 1);

    wait_for_label(&tracker, Some("develop")).await;
    assert!(labels.has_changed().unwrap());
    assert_eq!(labels.borrow_and_update().as_deref(), Some("develop"));
    assert_eq!(h.executor.call_count(ABBREV_REF_COMMAND), 2);
}

#[tokio::test]
async fn change_event_into_detached_state_shows_hash() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    wait_for_label(&tracker, Some("main")).await;
    wait_for_watch(&tracker).await;

    h.executor.succeed(ABBREV_REF_COMMAND, "HEAD\n");
    h.executor.succeed(SHORT_HASH_COMMAND, "a1b2c3d\n");
    h.watcher.fire();

    wait_for_label(&tracker, Some("a1b2c3d")).await;
}

#[tokio::test]
async fn failing_requery_clears_label() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    wait_for_label(&tracker, Some("main")).await;
    wait_for_watch(&tracker).await;

    h.executor.fail(ABBREV_REF_COMMAND);
    h.watcher.fire();

    wait_for_label(&tracker, None).await;
    // The subscription survives a failed query.
    assert!(tracker.is_watching());
}

#[tokio::test]
async fn every_event_triggers_a_resolution() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    wait_for_watch(&tracker).await;
    eventually(|| h.executor.call_count(ABBREV_REF_COMMAND) == 1).await;

    h.watcher.fire();
    h.watcher.fire();
    h.watcher.fire();

    eventually(|| h.executor.call_count(ABBREV_REF_COMMAND) == 4).await;
    wait_for_label(&tracker, Some("main")).await;
}

#[tokio::test]
async fn rejected_probe_skips_registration_and_keeps_label() {
    let h = Harness::without_change_log();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    wait_for_label(&tracker, Some("main")).await;
    eventually(|| !h.fs.probed_paths().is_empty()).await;
    settle().await;

    assert_eq!(h.watcher.registration_count(), 0);
    assert!(!tracker.is_watching());

    // Nothing can deliver an event, so the label never moves again.
    h.executor.succeed(ABBREV_REF_COMMAND, "develop\n");
    assert_eq!(h.watcher.fire(), 0);
    settle().await;
    assert_eq!(tracker.label().as_deref(), Some("main"));
    assert_eq!(h.executor.call_count(ABBREV_REF_COMMAND), 1);

    tracker.stop();
    assert_eq!(h.watcher.close_count(), 0);
}

#[tokio::test]
async fn failed_registration_leaves_tracker_usable() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");
    h.watcher.fail_registrations();

    let tracker = h.start();
    wait_for_label(&tracker, Some("main")).await;
    eventually(|| h.watcher.registration_count() == 1).await;
    settle().await;

    assert!(!tracker.is_watching());
    assert!(tracker.is_running());

    tracker.stop();
    assert_eq!(h.watcher.close_count(), 0);
}

#[tokio::test]
async fn stop_releases_subscription_exactly_once() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    wait_for_watch(&tracker).await;

    tracker.stop();
    tracker.stop();

    assert_eq!(h.watcher.close_count(), 1);
    assert_eq!(h.watcher.active_count(), 0);
    assert!(!tracker.is_watching());
    assert!(!tracker.is_running());

    drop(tracker);
    assert_eq!(h.watcher.close_count(), 1);
}

#[tokio::test]
async fn dropping_tracker_releases_subscription() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    wait_for_watch(&tracker).await;
    drop(tracker);

    assert_eq!(h.watcher.close_count(), 1);
}

#[tokio::test]
async fn stop_during_probe_prevents_registration() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");
    h.fs.hold_probes();

    let tracker = h.start();
    eventually(|| !h.fs.probed_paths().is_empty()).await;

    tracker.stop();
    h.fs.release_probes();
    settle().await;

    assert_eq!(h.watcher.registration_count(), 0);
    assert_eq!(h.watcher.close_count(), 0);
    assert!(!tracker.is_watching());
}

#[tokio::test]
async fn stop_during_registration_closes_late_subscription() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");
    let gate = h.watcher.hold_next_registration();

    let tracker = h.start();
    eventually(|| h.watcher.registration_count() == 1).await;

    tracker.stop();
    assert_eq!(h.watcher.close_count(), 0);

    gate.open();
    eventually(|| h.watcher.close_count() == 1).await;
    settle().await;

    assert_eq!(h.watcher.close_count(), 1);
    assert_eq!(h.watcher.active_count(), 0);
    assert!(!tracker.is_watching());
}

#[tokio::test]
async fn completion_after_stop_is_discarded() {
    let h = Harness::new();
    let gate = h.executor.succeed_once_gated(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    let labels = tracker.subscribe();
    eventually(|| h.executor.call_count(ABBREV_REF_COMMAND) == 1).await;

    tracker.stop();
    gate.open();
    settle().await;

    assert_eq!(tracker.label(), None);
    assert!(!labels.has_changed().unwrap_or(false));
}

#[tokio::test]
async fn events_after_stop_do_not_requery() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    wait_for_label(&tracker, Some("main")).await;
    wait_for_watch(&tracker).await;

    tracker.stop();
    assert_eq!(h.watcher.fire(), 0);
    tracker.refresh();
    settle().await;

    assert_eq!(h.executor.call_count(ABBREV_REF_COMMAND), 1);
    assert_eq!(tracker.label().as_deref(), Some("main"));
}

#[tokio::test]
async fn stop_before_anything_completes_is_safe() {
    let h = Harness::new();
    h.fs.hold_probes();
    let gate = h.executor.succeed_once_gated(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    tracker.stop();
    tracker.stop();

    gate.open();
    h.fs.release_probes();
    settle().await;

    assert_eq!(tracker.label(), None);
    assert_eq!(h.watcher.registration_count(), 0);
    assert_eq!(h.watcher.close_count(), 0);
}

#[tokio::test]
async fn refresh_requeries_on_demand() {
    let h = Harness::without_change_log();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = h.start();
    wait_for_label(&tracker, Some("main")).await;

    h.executor.succeed(ABBREV_REF_COMMAND, "feature/x\n");
    tracker.refresh();

    wait_for_label(&tracker, Some("feature/x")).await;
}

#[tokio::test]
async fn auto_refresh_disabled_never_probes() {
    let h = Harness::new();
    h.executor.succeed(ABBREV_REF_COMMAND, "main\n");

    let tracker = BranchNameTracker::builder(&h.dir)
        .executor(h.executor.clone())
        .file_system(std::sync::Arc::new(h.fs.clone()))
        .watcher(std::sync::Arc::new(h.watcher.clone()))
        .auto_refresh(false)
        .start();

    wait_for_label(&tracker, Some("main")).await;
    settle().await;

    assert!(h.fs.probed_paths().is_empty());
    assert_eq!(h.watcher.registration_count(), 0);
}
