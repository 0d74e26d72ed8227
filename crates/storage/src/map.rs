// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory map representations: a single submap's contents, a mission
//! inside the merged map, and the merged map itself (§3).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vimap_core::{MissionId, SensorId, Transform};

/// One pose sample from a submap or the merged map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub timestamp_ns: i64,
    /// Global frame -> body frame, as currently optimized.
    pub t_g_b: Transform,
    /// Mission (odometry) frame -> body frame, as received from the robot.
    pub t_m_b: Transform,
    /// Global frame -> mission frame, as of submap arrival.
    pub t_g_m: Transform,
}

/// A sensor's fixed extrinsic transform relative to the body frame.
pub type SensorExtrinsics = Transform;

/// The contents of one loaded submap: a single mission's worth of data,
/// before it has been transferred into the merged map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmapData {
    pub mission_id: MissionId,
    pub sensors: BTreeMap<SensorId, SensorExtrinsics>,
    /// Ordered by `timestamp_ns` ascending.
    pub vertices: Vec<Vertex>,
}

impl SubmapData {
    /// The latest (timestamp, T_M_B, T_G_M) tuple, per §4.2(c).
    pub fn latest_unoptimized_pose(&self) -> Option<(i64, Transform, Transform)> {
        self.vertices
            .iter()
            .max_by_key(|v| v.timestamp_ns)
            .map(|v| (v.timestamp_ns, v.t_m_b, v.t_g_m))
    }
}

/// One mission's accumulated state inside the merged map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mission {
    pub sensors: BTreeMap<SensorId, SensorExtrinsics>,
    pub vertices: BTreeMap<i64, Vertex>,
}

impl Mission {
    /// Append a submap's vertices and sensors. Sensors already present are
    /// left untouched (a submap re-declaring the same sensor is a no-op).
    fn absorb(&mut self, submap: SubmapData) {
        for (id, extrinsics) in submap.sensors {
            self.sensors.entry(id).or_insert(extrinsics);
        }
        for v in submap.vertices {
            self.vertices.insert(v.timestamp_ns, v);
        }
    }

    pub fn oldest_timestamp(&self) -> Option<i64> {
        self.vertices.keys().next().copied()
    }

    pub fn latest_timestamp(&self) -> Option<i64> {
        self.vertices.keys().next_back().copied()
    }

    /// The two vertices bracketing `timestamp_ns`, for interpolation.
    /// Returns `None` if the timestamp is outside `[oldest, latest]`.
    pub fn bracket(&self, timestamp_ns: i64) -> Option<(&Vertex, &Vertex)> {
        if let Some(exact) = self.vertices.get(&timestamp_ns) {
            return Some((exact, exact));
        }
        let before = self.vertices.range(..timestamp_ns).next_back();
        let after = self.vertices.range(timestamp_ns..).next();
        match (before, after) {
            (Some((_, a)), Some((_, b))) => Some((a, b)),
            _ => None,
        }
    }
}

/// The single growing global map (§3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergedMap {
    pub missions: std::collections::HashMap<MissionId, Mission>,
}

impl MergedMap {
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// Merge a loaded submap's contents into (or create) its mission.
    pub fn append_submap(&mut self, submap: SubmapData) {
        self.missions.entry(submap.mission_id.clone()).or_default().absorb(submap);
    }

    pub fn mission(&self, id: &MissionId) -> Option<&Mission> {
        self.missions.get(id)
    }

    pub fn remove_mission(&mut self, id: &MissionId) -> bool {
        self.missions.remove(id).is_some()
    }

    pub fn mission_ids(&self) -> impl Iterator<Item = &MissionId> {
        self.missions.keys()
    }
}

#[cfg(test)]
#[path = "map_tests.rs"]
mod tests;
