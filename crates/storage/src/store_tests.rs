// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::map::SubmapData;
use std::collections::BTreeMap;
use vimap_core::MissionId;

fn submap(mission: &str) -> SubmapData {
    SubmapData {
        mission_id: MissionId::new(mission),
        sensors: BTreeMap::new(),
        vertices: Vec::new(),
    }
}

#[test]
fn insert_and_fetch_submap_handle() {
    let store = MapStore::new();
    let key = MapKey::new("submap_abc");
    store.insert_submap(key.clone(), submap("m1"));

    let handle = store.submap_handle(&key).expect("handle present");
    assert_eq!(handle.read().mission_id.as_str(), "m1");
}

#[test]
fn missing_submap_handle_is_none() {
    let store = MapStore::new();
    assert!(store.submap_handle(&MapKey::new("nope")).is_none());
}

#[test]
fn remove_submap_drops_the_handle() {
    let store = MapStore::new();
    let key = MapKey::new("submap_abc");
    store.insert_submap(key.clone(), submap("m1"));
    store.remove_submap(&key);
    assert!(store.submap_handle(&key).is_none());
}

#[test]
fn merged_map_starts_absent() {
    let store = MapStore::new();
    assert!(store.merged().read().is_none());
}

#[test]
fn merged_handle_is_shared_across_calls() {
    let store = MapStore::new();
    let handle_a = store.merged();
    *handle_a.write() = Some(crate::map::MergedMap::default());

    let handle_b = store.merged();
    assert!(handle_b.read().is_some());
}

#[test]
fn checkpoint_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("checkpoint.json");

    let store = MapStore::new();
    *store.merged().write() = Some({
        let mut map = crate::map::MergedMap::default();
        map.append_submap(submap("m1"));
        map
    });

    store.checkpoint_to(&path, 1_000).expect("checkpoint");

    let restored = MapStore::new();
    restored.restore_from(&path).expect("restore");
    assert!(restored
        .merged()
        .read()
        .as_ref()
        .expect("merged map present")
        .mission(&MissionId::new("m1"))
        .is_some());
}

#[test]
fn checkpoint_to_is_a_noop_when_merged_map_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("checkpoint.json");
    let store = MapStore::new();
    store.checkpoint_to(&path, 0).expect("noop checkpoint");
    assert!(!path.exists());
}

#[test]
fn save_map_is_an_alias_for_checkpoint_to() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("saved.json");
    let store = MapStore::new();
    *store.merged().write() = Some(crate::map::MergedMap::default());
    store.save_map(&path, 7).expect("save");
    assert!(path.exists());
}
