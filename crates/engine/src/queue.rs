// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Submap Queue: an ordered backlog of in-flight submaps (§3).
//!
//! Stage flags live behind a per-record mutex so ingest-pool workers can
//! update one record's flags while the merge loop scans the whole spine
//! under a single, short-lived queue lock (§9 design note, option (a):
//! arena-style handles, each with its own lock).

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use vimap_core::{MapHash, MapKey, MissionId, RobotId};

#[derive(Debug, Default)]
struct SubmapProcessState {
    map_key: Option<MapKey>,
    mission_id: Option<MissionId>,
    is_loaded: bool,
    is_processed: bool,
    is_merged: bool,
    current_command: Option<String>,
}

/// One submap in flight, from notification to merge. Flags are monotonic:
/// once set, never cleared.
#[derive(Debug)]
pub struct SubmapProcess {
    pub robot_name: RobotId,
    pub path: PathBuf,
    pub map_hash: MapHash,
    state: Mutex<SubmapProcessState>,
}

impl SubmapProcess {
    pub fn new(robot_name: RobotId, path: PathBuf, map_hash: MapHash) -> Self {
        Self { robot_name, path, map_hash, state: Mutex::new(SubmapProcessState::default()) }
    }

    pub fn mark_loaded(&self, map_key: MapKey, mission_id: MissionId) {
        let mut s = self.state.lock();
        s.map_key = Some(map_key);
        s.mission_id = Some(mission_id);
        s.is_loaded = true;
    }

    pub fn mark_processed(&self) {
        self.state.lock().is_processed = true;
    }

    pub fn mark_merged(&self) {
        self.state.lock().is_merged = true;
    }

    pub fn set_current_command(&self, command: Option<String>) {
        self.state.lock().current_command = command;
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().is_loaded
    }

    pub fn is_processed(&self) -> bool {
        self.state.lock().is_processed
    }

    pub fn is_merged(&self) -> bool {
        self.state.lock().is_merged
    }

    pub fn map_key(&self) -> Option<MapKey> {
        self.state.lock().map_key.clone()
    }

    pub fn mission_id(&self) -> Option<MissionId> {
        self.state.lock().mission_id.clone()
    }

    pub fn current_command(&self) -> Option<String> {
        self.state.lock().current_command.clone()
    }
}

/// Ordered backlog of pending submaps (§3). FIFO within a robot's own
/// submissions is maintained by never reordering the spine — only the head
/// is ever popped.
#[derive(Default)]
pub struct SubmapQueue {
    records: Mutex<VecDeque<Arc<SubmapProcess>>>,
}

impl SubmapQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if a record with this hash is already queued (duplicate
    /// notification, §4.2 step 1).
    pub fn contains_hash(&self, hash: &MapHash) -> bool {
        self.records.lock().iter().any(|r| &r.map_hash == hash)
    }

    pub fn push(&self, record: Arc<SubmapProcess>) {
        self.records.lock().push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Snapshot of every queued record, head first, for status reporting.
    pub fn snapshot(&self) -> Vec<Arc<SubmapProcess>> {
        self.records.lock().iter().cloned().collect()
    }

    /// Pop the maximal head prefix that is either mergeable (processed and
    /// not blacklisted) or discardable (blacklisted, regardless of stage).
    /// Discardable records are popped but returned separately so the caller
    /// does not merge their contents. Stops at the first record that is
    /// neither (§4.3 step 2).
    pub fn drain_mergeable_prefix(
        &self,
        is_blacklisted: impl Fn(&MissionId) -> bool,
    ) -> (Vec<Arc<SubmapProcess>>, Vec<Arc<SubmapProcess>>) {
        let mut to_merge = Vec::new();
        let mut to_discard = Vec::new();
        let mut records = self.records.lock();

        while let Some(front) = records.front() {
            let blacklisted = front.mission_id().is_some_and(|m| is_blacklisted(&m));
            if blacklisted {
                #[allow(clippy::expect_used)]
                let record = records.pop_front().expect("front just returned Some above");
                to_discard.push(record);
                continue;
            }
            if front.is_processed() {
                #[allow(clippy::expect_used)]
                let record = records.pop_front().expect("front just returned Some above");
                to_merge.push(record);
                continue;
            }
            break;
        }

        (to_merge, to_discard)
    }

    /// Remove a specific record regardless of position (used when a load
    /// fails, or a submap is blacklisted before it reaches the head).
    pub fn remove(&self, hash: &MapHash) {
        self.records.lock().retain(|r| &r.map_hash != hash);
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
