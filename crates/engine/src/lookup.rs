// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Lookup Service (§4.5): a read-only query path against the merged
//! map. Reads take the merged map's read lock, so a lookup observes either
//! the pre- or post-iteration state, never an intermediate one (§5).

use std::collections::HashSet;
use std::sync::Arc;
use vimap_core::{MissionId, RobotId, SensorId, Vec3};
use vimap_storage::MapStore;

use crate::registry::RobotRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStatus {
    Success,
    NoSuchMission,
    NoSuchSensor,
    PoseNotAvailableYet,
    PoseNeverAvailable,
}

vimap_core::simple_display! {
    LookupStatus {
        Success => "success",
        NoSuchMission => "no_such_mission",
        NoSuchSensor => "no_such_sensor",
        PoseNotAvailableYet => "pose_not_available_yet",
        PoseNeverAvailable => "pose_never_available",
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LookupResult {
    pub status: LookupStatus,
    /// The queried point, expressed in the global frame.
    pub p_g: Option<Vec3>,
    /// The sensor's origin, expressed in the global frame.
    pub sensor_origin_g: Option<Vec3>,
}

impl LookupResult {
    fn status_only(status: LookupStatus) -> Self {
        Self { status, p_g: None, sensor_origin_g: None }
    }
}

pub struct LookupService {
    store: Arc<MapStore>,
    registry: Arc<RobotRegistry>,
    sensor_whitelist: Option<HashSet<SensorId>>,
}

impl LookupService {
    pub fn new(store: Arc<MapStore>, registry: Arc<RobotRegistry>, sensor_whitelist: Option<HashSet<SensorId>>) -> Self {
        Self { store, registry, sensor_whitelist }
    }

    pub fn map_lookup(&self, robot_name: &RobotId, sensor_type: &SensorId, timestamp_ns: i64, p_s: Vec3) -> LookupResult {
        let Some(mission_id) = self.registry.latest_mission(robot_name) else {
            return LookupResult::status_only(LookupStatus::NoSuchMission);
        };

        let merged = self.store.merged();
        let guard = merged.read();
        let Some(map) = guard.as_ref() else {
            return LookupResult::status_only(LookupStatus::PoseNotAvailableYet);
        };
        let Some(mission) = map.mission(&mission_id) else {
            return LookupResult::status_only(LookupStatus::NoSuchMission);
        };

        if self.whitelist_excludes(sensor_type) {
            return LookupResult::status_only(LookupStatus::NoSuchSensor);
        }
        let Some(t_b_s) = mission.sensors.get(sensor_type) else {
            return LookupResult::status_only(LookupStatus::NoSuchSensor);
        };

        let (Some(oldest), Some(latest)) = (mission.oldest_timestamp(), mission.latest_timestamp()) else {
            return LookupResult::status_only(LookupStatus::PoseNotAvailableYet);
        };
        if timestamp_ns > latest {
            return LookupResult::status_only(LookupStatus::PoseNotAvailableYet);
        }
        if timestamp_ns < oldest {
            return LookupResult::status_only(LookupStatus::PoseNeverAvailable);
        }

        #[allow(clippy::expect_used)]
        let (a, b) = mission.bracket(timestamp_ns).expect("timestamp_ns was just checked to be within [oldest, latest]");
        let t = if b.timestamp_ns == a.timestamp_ns {
            0.0
        } else {
            (timestamp_ns - a.timestamp_ns) as f64 / (b.timestamp_ns - a.timestamp_ns) as f64
        };
        let t_g_b = a.t_g_b.interpolate(b.t_g_b, t);
        let t_g_s = t_g_b.compose(*t_b_s);

        LookupResult {
            status: LookupStatus::Success,
            p_g: Some(t_g_s.apply(p_s)),
            sensor_origin_g: Some(t_g_s.translation),
        }
    }

    fn whitelist_excludes(&self, sensor_type: &SensorId) -> bool {
        match &self.sensor_whitelist {
            Some(whitelist) => !whitelist.contains(sensor_type),
            None => false,
        }
    }

    /// All mission ids known through either the registry or the merged map,
    /// for `deleteMission`'s partial-id resolution (§4.4).
    pub fn known_mission_ids(&self) -> Vec<MissionId> {
        let mut ids = self.registry.all_mission_ids();
        let merged = self.store.merged();
        if let Some(map) = merged.read().as_ref() {
            for id in map.mission_ids() {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }
}

#[cfg(test)]
#[path = "lookup_tests.rs"]
mod tests;
