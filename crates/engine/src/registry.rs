// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Robot Registry: per-robot mission chains, odometry anchors, and the
//! mission -> robot reverse index (§3), all guarded by a single lock since
//! the forward and reverse maps must change together.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, VecDeque};
use vimap_core::{MissionId, RobotId, Transform};

#[derive(Default)]
struct RegistryState {
    mission_ids: HashMap<RobotId, VecDeque<MissionId>>,
    mission_to_robot: HashMap<MissionId, RobotId>,
    t_m_b_submaps_input: HashMap<RobotId, BTreeMap<i64, Transform>>,
    t_g_m_submaps_input: HashMap<RobotId, BTreeMap<i64, Transform>>,
}

#[derive(Default)]
pub struct RobotRegistry {
    state: RwLock<RegistryState>,
}

impl RobotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one submap's mission and latest unoptimized pose for `robot`
    /// (§4.2 steps b-c). Prepends `mission` to the chain if it is not
    /// already the front.
    pub fn record_submap(
        &self,
        robot: &RobotId,
        mission: &MissionId,
        timestamp_ns: i64,
        t_m_b: Transform,
        t_g_m: Transform,
    ) {
        let mut s = self.state.write();

        let chain = s.mission_ids.entry(robot.clone()).or_default();
        if chain.front() != Some(mission) {
            chain.push_front(mission.clone());
        }
        s.mission_to_robot.insert(mission.clone(), robot.clone());

        s.t_m_b_submaps_input.entry(robot.clone()).or_default().insert(timestamp_ns, t_m_b);
        s.t_g_m_submaps_input.entry(robot.clone()).or_default().insert(timestamp_ns, t_g_m);
    }

    /// The mission most recently ingested for `robot`, if any.
    pub fn latest_mission(&self, robot: &RobotId) -> Option<MissionId> {
        self.state.read().mission_ids.get(robot).and_then(|c| c.front().cloned())
    }

    pub fn missions_for_robot(&self, robot: &RobotId) -> Vec<MissionId> {
        self.state.read().mission_ids.get(robot).map(|c| c.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn robot_for_mission(&self, mission: &MissionId) -> Option<RobotId> {
        self.state.read().mission_to_robot.get(mission).cloned()
    }

    /// Every mission id known to the registry, for partial-id resolution.
    pub fn all_mission_ids(&self) -> Vec<MissionId> {
        self.state.read().mission_to_robot.keys().cloned().collect()
    }

    /// Every robot the registry has ever recorded a submap for, for the
    /// status snapshot's per-robot mission chain listing (§4.6).
    pub fn known_robots(&self) -> Vec<RobotId> {
        self.state.read().mission_ids.keys().cloned().collect()
    }

    pub fn t_m_b_at(&self, robot: &RobotId, timestamp_ns: i64) -> Option<Transform> {
        self.state.read().t_m_b_submaps_input.get(robot).and_then(|m| m.get(&timestamp_ns).copied())
    }

    pub fn t_g_m_at(&self, robot: &RobotId, timestamp_ns: i64) -> Option<Transform> {
        self.state.read().t_g_m_submaps_input.get(robot).and_then(|m| m.get(&timestamp_ns).copied())
    }

    /// The most recent timestamp at or before `at_most`, present in
    /// `T_M_B_submaps_input[robot]` (§4.3 step 4: intersect merged-map
    /// timestamps with this robot's recorded anchors).
    pub fn latest_anchor_at_most(&self, robot: &RobotId, at_most: i64) -> Option<i64> {
        self.state
            .read()
            .t_m_b_submaps_input
            .get(robot)
            .and_then(|m| m.range(..=at_most).next_back().map(|(ts, _)| *ts))
    }

    /// Remove `mission` from the forward chain and reverse index (§4.3 step
    /// 1: clear blacklisted-mission entries from the registry). The
    /// anchor tables are left untouched since they are keyed by robot, not
    /// mission, and other missions from the same robot may still need them.
    pub fn remove_mission(&self, mission: &MissionId) {
        let mut s = self.state.write();
        if let Some(robot) = s.mission_to_robot.remove(mission) {
            if let Some(chain) = s.mission_ids.get_mut(&robot) {
                chain.retain(|m| m != mission);
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
