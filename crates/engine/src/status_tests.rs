// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use parking_lot::Mutex as PMutex;
use vimap_core::{MissionId, RobotId};

struct RecordingStatusPublisher {
    calls: PMutex<Vec<String>>,
}

impl StatusPublisher for RecordingStatusPublisher {
    fn publish(&self, status: &str) {
        self.calls.lock().push(status.to_string());
    }
}

#[test]
fn snapshot_includes_queue_and_blacklist_contents() {
    let queue = Arc::new(SubmapQueue::new());
    let blacklist = Arc::new(Blacklist::new());
    blacklist.insert(MissionId::new("m1"), "operator request");
    let registry = Arc::new(RobotRegistry::new());
    let merge_status = Arc::new(MergeStatus::default());

    let reporter = StatusReporter::new(
        queue,
        blacklist,
        registry,
        merge_status,
        None,
        Duration::from_millis(10),
        Arc::new(ShutdownSignal::new()),
    );

    let snapshot = reporter.build_snapshot();
    assert!(snapshot.contains("queue_len=0"));
    assert!(snapshot.contains("m1:operator request"));
}

#[test]
fn run_publishes_to_the_registered_callback_even_once() {
    let shutdown = Arc::new(ShutdownSignal::new());
    let publisher = Arc::new(RecordingStatusPublisher { calls: PMutex::new(Vec::new()) });
    let reporter = StatusReporter::new(
        Arc::new(SubmapQueue::new()),
        Arc::new(Blacklist::new()),
        Arc::new(RobotRegistry::new()),
        Arc::new(MergeStatus::default()),
        Some(Arc::clone(&publisher) as Arc<dyn StatusPublisher>),
        Duration::from_millis(10),
        Arc::clone(&shutdown),
    );

    let handle = std::thread::spawn(move || reporter.run());
    std::thread::sleep(Duration::from_millis(30));
    shutdown.trigger();
    handle.join().expect("status thread joins");

    assert!(!publisher.calls.lock().is_empty());
}

#[test]
fn robots_recorded_in_the_registry_appear_in_the_snapshot() {
    let registry = Arc::new(RobotRegistry::new());
    let robot = RobotId::new("r1");
    registry.record_submap(&robot, &MissionId::new("m1"), 0, vimap_core::Transform::IDENTITY, vimap_core::Transform::IDENTITY);

    let reporter = StatusReporter::new(
        Arc::new(SubmapQueue::new()),
        Arc::new(Blacklist::new()),
        registry,
        Arc::new(MergeStatus::default()),
        None,
        Duration::from_millis(10),
        Arc::new(ShutdownSignal::new()),
    );

    let snapshot = reporter.build_snapshot();
    assert!(snapshot.contains("r1:m1"));
}
