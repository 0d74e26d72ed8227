// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::command::LoggingCommandRunner;
use crate::publishers::LoggingPoseCorrectionPublisher;
use crate::queue::SubmapProcess;
use parking_lot::Mutex as PMutex;
use std::collections::BTreeMap;
use vimap_core::{FakeClock, MapHash, Quat, Transform, Vec3};
use vimap_storage::{SubmapData, Vertex};

struct RecordingPublisher {
    calls: PMutex<Vec<(RobotId, i64)>>,
}

impl PoseCorrectionPublisher for RecordingPublisher {
    fn publish(&self, robot_name: &RobotId, correction: &PoseCorrection) {
        self.calls.lock().push((robot_name.clone(), correction.timestamp_ns));
    }
}

fn vertex(ts: i64, x: f64) -> Vertex {
    Vertex {
        timestamp_ns: ts,
        t_g_b: Transform::new(Quat::IDENTITY, Vec3::new(x, 0.0, 0.0)),
        t_m_b: Transform::new(Quat::IDENTITY, Vec3::new(x, 0.0, 0.0)),
        t_g_m: Transform::IDENTITY,
    }
}

fn harness() -> (
    Arc<MapStore>,
    Arc<SubmapQueue>,
    Arc<Blacklist>,
    Arc<RobotRegistry>,
    Arc<ShutdownSignal>,
) {
    (
        Arc::new(MapStore::new()),
        Arc::new(SubmapQueue::new()),
        Arc::new(Blacklist::new()),
        Arc::new(RobotRegistry::new()),
        Arc::new(ShutdownSignal::new()),
    )
}

fn loaded_record(
    store: &MapStore,
    registry: &RobotRegistry,
    robot: &RobotId,
    mission: &MissionId,
    ts: i64,
) -> Arc<SubmapProcess> {
    let hash = MapHash::new(format!("hash-{ts}"));
    let key = MapKey::for_submap(&hash);
    store.insert_submap(
        key.clone(),
        SubmapData { mission_id: mission.clone(), sensors: BTreeMap::new(), vertices: vec![vertex(ts, ts as f64)] },
    );
    registry.record_submap(robot, mission, ts, Transform::new(Quat::IDENTITY, Vec3::new(ts as f64, 0.0, 0.0)), Transform::IDENTITY);
    let record = Arc::new(SubmapProcess::new(robot.clone(), PathBuf::from(format!("/tmp/{ts}.json")), hash));
    record.mark_loaded(key, mission.clone());
    record.mark_processed();
    record
}

#[test]
fn appends_a_processed_submap_into_the_merged_map() {
    let (store, queue, blacklist, registry, shutdown) = harness();
    let robot = RobotId::new("r1");
    let mission = MissionId::new("m1");
    queue.push(loaded_record(&store, &registry, &robot, &mission, 100));

    let loop_ = MergeLoop::new(
        Arc::clone(&store),
        Arc::clone(&queue),
        blacklist,
        registry,
        Arc::new(LoggingCommandRunner),
        Arc::new(LoggingPoseCorrectionPublisher),
        Vec::new(),
        PathBuf::from("/tmp/unused-checkpoint.json"),
        u64::MAX,
        Duration::from_millis(10),
        FakeClock::new(),
        shutdown,
    );

    loop_.run_iteration();

    let merged = store.merged();
    let guard = merged.read();
    let map = guard.as_ref().expect("merged map created");
    assert!(map.mission(&mission).is_some());
    assert!(queue.is_empty());
}

#[test]
fn blacklisted_mission_is_removed_on_the_next_iteration() {
    let (store, queue, blacklist, registry, shutdown) = harness();
    let robot = RobotId::new("r1");
    let mission = MissionId::new("m1");
    queue.push(loaded_record(&store, &registry, &robot, &mission, 100));

    let loop_ = MergeLoop::new(
        Arc::clone(&store),
        Arc::clone(&queue),
        Arc::clone(&blacklist),
        Arc::clone(&registry),
        Arc::new(LoggingCommandRunner),
        Arc::new(LoggingPoseCorrectionPublisher),
        Vec::new(),
        PathBuf::from("/tmp/unused-checkpoint.json"),
        u64::MAX,
        Duration::from_millis(10),
        FakeClock::new(),
        shutdown,
    );
    loop_.run_iteration();
    assert!(store.merged().read().as_ref().expect("present").mission(&mission).is_some());

    blacklist.insert(mission.clone(), "operator request");
    loop_.run_iteration();

    let merged = store.merged();
    let guard = merged.read();
    match guard.as_ref() {
        Some(map) => assert!(map.mission(&mission).is_none()),
        None => {}
    }
}

#[test]
fn publishes_a_correction_once_data_is_merged() {
    let (store, queue, blacklist, registry, shutdown) = harness();
    let robot = RobotId::new("r1");
    let mission = MissionId::new("m1");
    queue.push(loaded_record(&store, &registry, &robot, &mission, 100));

    let publisher = Arc::new(RecordingPublisher { calls: PMutex::new(Vec::new()) });
    let loop_ = MergeLoop::new(
        Arc::clone(&store),
        Arc::clone(&queue),
        blacklist,
        registry,
        Arc::new(LoggingCommandRunner),
        Arc::clone(&publisher) as Arc<dyn PoseCorrectionPublisher>,
        Vec::new(),
        PathBuf::from("/tmp/unused-checkpoint.json"),
        u64::MAX,
        Duration::from_millis(10),
        FakeClock::new(),
        shutdown,
    );

    loop_.run_iteration();
    assert_eq!(publisher.calls.lock().as_slice(), &[(robot, 100)]);

    // A second iteration with no new data must not re-publish.
    loop_.run_iteration();
    assert_eq!(publisher.calls.lock().len(), 1);
}

#[test]
fn checkpoints_when_interval_elapses() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("checkpoint.json");
    let (store, queue, blacklist, registry, shutdown) = harness();
    let robot = RobotId::new("r1");
    let mission = MissionId::new("m1");
    queue.push(loaded_record(&store, &registry, &robot, &mission, 100));

    let clock = FakeClock::new();
    let loop_ = MergeLoop::new(
        Arc::clone(&store),
        queue,
        blacklist,
        registry,
        Arc::new(LoggingCommandRunner),
        Arc::new(LoggingPoseCorrectionPublisher),
        Vec::new(),
        path.clone(),
        0,
        Duration::from_millis(10),
        clock,
        shutdown,
    );

    loop_.run_iteration();
    assert!(path.exists());
}
