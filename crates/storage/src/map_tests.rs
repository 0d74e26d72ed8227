// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use vimap_core::{Quat, Vec3};

fn vertex(ts: i64) -> Vertex {
    Vertex {
        timestamp_ns: ts,
        t_g_b: Transform::new(Quat::IDENTITY, Vec3::new(ts as f64, 0.0, 0.0)),
        t_m_b: Transform::IDENTITY,
        t_g_m: Transform::IDENTITY,
    }
}

fn submap(mission: &str, timestamps: &[i64]) -> SubmapData {
    SubmapData {
        mission_id: MissionId::new(mission),
        sensors: BTreeMap::new(),
        vertices: timestamps.iter().map(|t| vertex(*t)).collect(),
    }
}

#[test]
fn latest_unoptimized_pose_picks_max_timestamp() {
    let data = submap("m1", &[100, 300, 200]);
    let (ts, _, _) = data.latest_unoptimized_pose().expect("has vertices");
    assert_eq!(ts, 300);
}

#[test]
fn empty_submap_has_no_latest_pose() {
    let data = submap("m1", &[]);
    assert!(data.latest_unoptimized_pose().is_none());
}

#[test]
fn append_submap_creates_mission_lazily() {
    let mut map = MergedMap::default();
    assert!(map.is_empty());
    map.append_submap(submap("m1", &[100]));
    assert!(!map.is_empty());
    assert!(map.mission(&MissionId::new("m1")).is_some());
}

#[test]
fn append_submap_accumulates_vertices_across_calls() {
    let mut map = MergedMap::default();
    map.append_submap(submap("m1", &[100, 200]));
    map.append_submap(submap("m1", &[300]));

    let mission = map.mission(&MissionId::new("m1")).expect("mission");
    assert_eq!(mission.oldest_timestamp(), Some(100));
    assert_eq!(mission.latest_timestamp(), Some(300));
}

#[test]
fn remove_mission_empties_map() {
    let mut map = MergedMap::default();
    map.append_submap(submap("m1", &[100]));
    assert!(map.remove_mission(&MissionId::new("m1")));
    assert!(map.is_empty());
    assert!(!map.remove_mission(&MissionId::new("m1")));
}

#[test]
fn bracket_returns_exact_match_when_present() {
    let mut map = MergedMap::default();
    map.append_submap(submap("m1", &[100, 200, 300]));
    let mission = map.mission(&MissionId::new("m1")).expect("mission");
    let (a, b) = mission.bracket(200).expect("bracket");
    assert_eq!(a.timestamp_ns, 200);
    assert_eq!(b.timestamp_ns, 200);
}

#[test]
fn bracket_returns_surrounding_vertices() {
    let mut map = MergedMap::default();
    map.append_submap(submap("m1", &[100, 300]));
    let mission = map.mission(&MissionId::new("m1")).expect("mission");
    let (a, b) = mission.bracket(150).expect("bracket");
    assert_eq!(a.timestamp_ns, 100);
    assert_eq!(b.timestamp_ns, 300);
}

#[test]
fn bracket_returns_none_outside_range() {
    let mut map = MergedMap::default();
    map.append_submap(submap("m1", &[100, 300]));
    let mission = map.mission(&MissionId::new("m1")).expect("mission");
    assert!(mission.bracket(50).is_none());
    assert!(mission.bracket(1_000_000).is_none());
}
