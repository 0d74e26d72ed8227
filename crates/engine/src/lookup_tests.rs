// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::BTreeMap;
use vimap_core::{Quat, Transform};
use vimap_storage::{SubmapData, Vertex};

fn vertex(ts: i64, x: f64) -> Vertex {
    Vertex {
        timestamp_ns: ts,
        t_g_b: Transform::new(Quat::IDENTITY, Vec3::new(x, 0.0, 0.0)),
        t_m_b: Transform::IDENTITY,
        t_g_m: Transform::IDENTITY,
    }
}

fn setup(sensor_whitelist: Option<HashSet<SensorId>>) -> (LookupService, RobotId, MissionId) {
    let store = Arc::new(MapStore::new());
    let registry = Arc::new(RobotRegistry::new());
    let robot = RobotId::new("r1");
    let mission = MissionId::new("m1");
    registry.record_submap(&robot, &mission, 100, Transform::IDENTITY, Transform::IDENTITY);

    let mut sensors = BTreeMap::new();
    sensors.insert(SensorId::new("cam0"), Transform::IDENTITY);
    let mut map = vimap_storage::MergedMap::default();
    map.append_submap(SubmapData {
        mission_id: mission.clone(),
        sensors,
        vertices: vec![vertex(100, 1.0), vertex(200, 2.0)],
    });
    *store.merged().write() = Some(map);

    (LookupService::new(store, registry, sensor_whitelist), robot, mission)
}

#[test]
fn unknown_robot_returns_no_such_mission() {
    let (lookup, _, _) = setup(None);
    let result = lookup.map_lookup(&RobotId::new("ghost"), &SensorId::new("cam0"), 100, Vec3::ZERO);
    assert_eq!(result.status, LookupStatus::NoSuchMission);
}

#[test]
fn unknown_sensor_returns_no_such_sensor() {
    let (lookup, robot, _) = setup(None);
    let result = lookup.map_lookup(&robot, &SensorId::new("lidar"), 100, Vec3::ZERO);
    assert_eq!(result.status, LookupStatus::NoSuchSensor);
}

#[test]
fn whitelist_hides_sensors_not_listed() {
    let (lookup, robot, _) = setup(Some(HashSet::from([SensorId::new("lidar")])));
    let result = lookup.map_lookup(&robot, &SensorId::new("cam0"), 100, Vec3::ZERO);
    assert_eq!(result.status, LookupStatus::NoSuchSensor);
}

#[test]
fn timestamp_past_latest_vertex_is_not_available_yet() {
    let (lookup, robot, _) = setup(None);
    let result = lookup.map_lookup(&robot, &SensorId::new("cam0"), 10_000, Vec3::ZERO);
    assert_eq!(result.status, LookupStatus::PoseNotAvailableYet);
}

#[test]
fn timestamp_before_oldest_vertex_is_never_available() {
    let (lookup, robot, _) = setup(None);
    let result = lookup.map_lookup(&robot, &SensorId::new("cam0"), 1, Vec3::ZERO);
    assert_eq!(result.status, LookupStatus::PoseNeverAvailable);
}

#[test]
fn exact_timestamp_match_succeeds() {
    let (lookup, robot, _) = setup(None);
    let result = lookup.map_lookup(&robot, &SensorId::new("cam0"), 100, Vec3::ZERO);
    assert_eq!(result.status, LookupStatus::Success);
    assert_eq!(result.p_g, Some(Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn interpolated_timestamp_succeeds_between_two_vertices() {
    let (lookup, robot, _) = setup(None);
    let result = lookup.map_lookup(&robot, &SensorId::new("cam0"), 150, Vec3::ZERO);
    assert_eq!(result.status, LookupStatus::Success);
    assert_eq!(result.p_g, Some(Vec3::new(1.5, 0.0, 0.0)));
}

#[test]
fn known_mission_ids_merges_registry_and_merged_map_sources() {
    let (lookup, _, mission) = setup(None);
    assert!(lookup.known_mission_ids().contains(&mission));
}
