// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Merge Loop (§4.3): the single thread that owns all mutation of the
//! merged map. Ingest parallelism plus single-threaded merge is the central
//! pattern of this engine — merging never happens in parallel (§9).

use crate::blacklist::Blacklist;
use crate::command::CommandRunner;
use crate::publishers::{PoseCorrection, PoseCorrectionPublisher};
use crate::queue::SubmapQueue;
use crate::registry::RobotRegistry;
use crate::shutdown::ShutdownSignal;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use vimap_core::{Clock, MapKey, MissionId, RobotId};
use vimap_storage::{MapStore, MergedMap};

/// Fields the Status Reporter reads each tick (§4.6): merge-loop busy flag,
/// the currently running global command, and the previous iteration's
/// wall-clock duration.
#[derive(Default)]
pub struct MergeStatus {
    busy: AtomicBool,
    current_command: Mutex<Option<String>>,
    duration_last_loop_s: Mutex<f64>,
}

impl MergeStatus {
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn current_command(&self) -> Option<String> {
        self.current_command.lock().clone()
    }

    pub fn duration_last_loop_s(&self) -> f64 {
        *self.duration_last_loop_s.lock()
    }
}

pub struct MergeLoop<C: Clock> {
    store: Arc<MapStore>,
    queue: Arc<SubmapQueue>,
    blacklist: Arc<Blacklist>,
    registry: Arc<RobotRegistry>,
    runner: Arc<dyn CommandRunner>,
    pose_publisher: Arc<dyn PoseCorrectionPublisher>,
    global_commands: Vec<String>,
    checkpoint_path: PathBuf,
    checkpoint_interval_s: u64,
    loop_interval: Duration,
    clock: C,
    shutdown: Arc<ShutdownSignal>,
    status: Arc<MergeStatus>,
    last_checkpoint_epoch_ms: Mutex<u64>,
    last_correction_ts: Mutex<HashMap<RobotId, i64>>,
}

#[allow(clippy::too_many_arguments)]
impl<C: Clock> MergeLoop<C> {
    pub fn new(
        store: Arc<MapStore>,
        queue: Arc<SubmapQueue>,
        blacklist: Arc<Blacklist>,
        registry: Arc<RobotRegistry>,
        runner: Arc<dyn CommandRunner>,
        pose_publisher: Arc<dyn PoseCorrectionPublisher>,
        global_commands: Vec<String>,
        checkpoint_path: PathBuf,
        checkpoint_interval_s: u64,
        loop_interval: Duration,
        clock: C,
        shutdown: Arc<ShutdownSignal>,
    ) -> Self {
        Self {
            store,
            queue,
            blacklist,
            registry,
            runner,
            pose_publisher,
            global_commands,
            checkpoint_path,
            checkpoint_interval_s,
            loop_interval,
            clock,
            shutdown,
            status: Arc::new(MergeStatus::default()),
            last_checkpoint_epoch_ms: Mutex::new(0),
            last_correction_ts: Mutex::new(HashMap::new()),
        }
    }

    pub fn status(&self) -> Arc<MergeStatus> {
        Arc::clone(&self.status)
    }

    /// Run iterations until shutdown is requested. Each iteration always
    /// completes in full (§5: in-flight commands are not interrupted
    /// mid-execution) before the shutdown flag is checked again.
    pub fn run(&self) {
        loop {
            if self.shutdown.is_set() {
                break;
            }
            self.status.busy.store(true, Ordering::SeqCst);
            let start = Instant::now();
            self.run_iteration();
            *self.status.duration_last_loop_s.lock() = start.elapsed().as_secs_f64();
            self.status.busy.store(false, Ordering::SeqCst);

            if self.shutdown.is_set() {
                break;
            }
            self.shutdown.sleep(self.loop_interval);
        }
        self.final_checkpoint();
    }

    fn run_iteration(&self) {
        self.delete_blacklisted_missions();
        self.append_available_submaps();
        self.run_global_commands();
        self.publish_corrections();
        self.maybe_checkpoint();
    }

    fn delete_blacklisted_missions(&self) {
        let blacklisted: Vec<MissionId> = self.blacklist.entries().into_iter().map(|e| e.mission_id).collect();
        if blacklisted.is_empty() {
            return;
        }
        let merged = self.store.merged();
        let mut guard = merged.write();
        if let Some(map) = guard.as_mut() {
            for mission_id in &blacklisted {
                if map.remove_mission(mission_id) {
                    self.registry.remove_mission(mission_id);
                }
            }
            if map.is_empty() {
                *guard = None;
            }
        }
    }

    fn append_available_submaps(&self) {
        let (to_merge, to_discard) = self.queue.drain_mergeable_prefix(|m| self.blacklist.contains(m));

        for record in &to_discard {
            if let Some(key) = record.map_key() {
                self.store.remove_submap(&key);
            }
        }

        if to_merge.is_empty() {
            return;
        }

        let merged = self.store.merged();
        let mut guard = merged.write();
        for record in &to_merge {
            let Some(key) = record.map_key() else { continue };
            if let Some(handle) = self.store.submap_handle(&key) {
                let data = handle.read().clone();
                guard.get_or_insert_with(MergedMap::default).append_submap(data);
                self.store.remove_submap(&key);
            }
            record.mark_merged();
        }
    }

    fn run_global_commands(&self) {
        let key = MapKey::merged();
        for command in &self.global_commands {
            *self.status.current_command.lock() = Some(command.clone());
            if let Err(error) = self.runner.run(&key, command) {
                tracing::warn!(%command, %error, "global command failed");
            }
        }
        *self.status.current_command.lock() = None;
    }

    /// §4.3 step 4. For each mission with data newer than the last published
    /// correction, find `t*` — the most recent timestamp present both in
    /// the merged map and in this robot's recorded odometry anchors — and
    /// emit the correction that re-anchors live odometry into the global
    /// frame.
    fn publish_corrections(&self) {
        let merged = self.store.merged();
        let guard = merged.read();
        let Some(map) = guard.as_ref() else { return };
        let mut last_published = self.last_correction_ts.lock();

        for mission_id in map.mission_ids() {
            let Some(robot) = self.registry.robot_for_mission(mission_id) else { continue };
            let Some(mission) = map.mission(mission_id) else { continue };
            let Some(latest_ts) = mission.latest_timestamp() else { continue };
            let Some(t_star) = self.registry.latest_anchor_at_most(&robot, latest_ts) else { continue };

            if last_published.get(&robot).is_some_and(|prev| *prev >= t_star) {
                continue;
            }

            let (Some(t_m_b_old), Some(t_g_m_old), Some(vertex)) = (
                self.registry.t_m_b_at(&robot, t_star),
                self.registry.t_g_m_at(&robot, t_star),
                mission.vertices.get(&t_star),
            ) else {
                continue;
            };

            let t_g_b_old = t_g_m_old.compose(t_m_b_old);
            let t_g_b_new = vertex.t_g_b;
            let t_b_old_b_new = t_g_b_old.inverse().compose(t_g_b_new);

            self.pose_publisher.publish(
                &robot,
                &PoseCorrection { timestamp_ns: t_star, t_m_b_old, t_g_m_old, t_g_b_new, t_b_old_b_new },
            );
            last_published.insert(robot, t_star);
        }
    }

    fn maybe_checkpoint(&self) {
        let now_ms = self.clock.epoch_ms();
        let mut last = self.last_checkpoint_epoch_ms.lock();
        let elapsed_s = now_ms.saturating_sub(*last) / 1000;
        if elapsed_s >= self.checkpoint_interval_s {
            if let Err(error) = self.store.checkpoint_to(&self.checkpoint_path, now_ms) {
                tracing::error!(%error, "checkpoint failed");
            }
            *last = now_ms;
        }
    }

    fn final_checkpoint(&self) {
        if self.store.merged().read().is_some() {
            let now_ms = self.clock.epoch_ms();
            if let Err(error) = self.store.checkpoint_to(&self.checkpoint_path, now_ms) {
                tracing::error!(%error, "final checkpoint on shutdown failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
