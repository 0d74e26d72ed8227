// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Server (§4.1): owns every collaborator and exposes the public
//! operations a transport (admin socket, filesystem watcher, ...) calls
//! into. `start()` spawns the merge loop and status reporter threads and
//! hands the ingest pool its workers; `shutdown()` reverses that in order.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use vimap_core::{Clock, MapError, MapResult, MissionId, RobotId, SensorId, SystemClock, Vec3};
use vimap_storage::{MapStore, SubmapLoader};

use crate::blacklist::{resolve_partial_id, Blacklist};
use crate::command::CommandRunner;
use crate::config::EngineConfig;
use crate::ingest::{AdmissionOutcome, IngestContext, IngestPool};
use crate::lookup::{LookupResult, LookupService};
use crate::merge::{MergeLoop, MergeStatus};
use crate::publishers::{PoseCorrectionPublisher, StatusPublisher, VisualizationPublisher};
use crate::queue::SubmapQueue;
use crate::registry::RobotRegistry;
use crate::shutdown::ShutdownSignal;
use crate::status::{render_status_snapshot, StatusReporter};

/// The engine's ambient collaborators (§2): everything a deployment wires
/// in at startup, bundled so `Server::new` does not take a dozen loose
/// arguments.
pub struct ServerDeps {
    pub loader: Arc<dyn SubmapLoader>,
    pub runner: Arc<dyn CommandRunner>,
    pub pose_publisher: Arc<dyn PoseCorrectionPublisher>,
    pub status_publisher: Option<Arc<dyn StatusPublisher>>,
    pub visualization_publisher: Arc<dyn VisualizationPublisher>,
}

pub struct Server<C: Clock = SystemClock> {
    config: EngineConfig,
    store: Arc<MapStore>,
    queue: Arc<SubmapQueue>,
    blacklist: Arc<Blacklist>,
    registry: Arc<RobotRegistry>,
    shutdown: Arc<ShutdownSignal>,
    ingest: Arc<IngestPool>,
    runner: Arc<dyn CommandRunner>,
    pose_publisher: Arc<dyn PoseCorrectionPublisher>,
    status_publisher: Option<Arc<dyn StatusPublisher>>,
    visualization_publisher: Arc<dyn VisualizationPublisher>,
    lookup: LookupService,
    clock: C,
    merge_status: Mutex<Option<Arc<MergeStatus>>>,
    threads: Mutex<Vec<JoinHandle<()>>>,
    started: AtomicBool,
}

impl<C: Clock + 'static> Server<C> {
    pub fn with_clock(config: EngineConfig, deps: ServerDeps, clock: C) -> Self {
        let store = Arc::new(MapStore::new());
        let queue = Arc::new(SubmapQueue::new());
        let blacklist = Arc::new(Blacklist::new());
        let registry = Arc::new(RobotRegistry::new());
        let shutdown = Arc::new(ShutdownSignal::new());

        let ingest_ctx = Arc::new(IngestContext {
            store: Arc::clone(&store),
            queue: Arc::clone(&queue),
            blacklist: Arc::clone(&blacklist),
            registry: Arc::clone(&registry),
            loader: deps.loader,
            runner: Arc::clone(&deps.runner),
            submap_commands: config.submap_commands.clone(),
            command_fail_fast: config.command_fail_fast,
        });
        let ingest = Arc::new(IngestPool::new(ingest_ctx));

        let lookup = LookupService::new(
            Arc::clone(&store),
            Arc::clone(&registry),
            config.lookup_sensor_whitelist.clone(),
        );

        Self {
            config,
            store,
            queue,
            blacklist,
            registry,
            shutdown,
            ingest,
            runner: deps.runner,
            pose_publisher: deps.pose_publisher,
            status_publisher: deps.status_publisher,
            visualization_publisher: deps.visualization_publisher,
            lookup,
            clock,
            merge_status: Mutex::new(None),
            threads: Mutex::new(Vec::new()),
            started: AtomicBool::new(false),
        }
    }

    /// If a checkpoint already exists at the configured path, load it before
    /// `start()` spawns the merge loop, so restarts resume from where they
    /// left off rather than an empty map.
    pub fn restore_checkpoint_if_present(&self) -> MapResult<()> {
        if self.config.checkpoint_path.exists() {
            self.store.restore_from(&self.config.checkpoint_path)?;
        }
        Ok(())
    }

    /// Spawn the ingest pool workers, the merge loop thread, and the status
    /// reporter thread (§4.1). Idempotent calls after the first return an
    /// error rather than spawning a second set of threads.
    pub fn start(&self) -> MapResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(MapError::invalid_argument("server already started"));
        }

        self.ingest.start(self.config.ingest_parallelism);

        let merge_loop = MergeLoop::new(
            Arc::clone(&self.store),
            Arc::clone(&self.queue),
            Arc::clone(&self.blacklist),
            Arc::clone(&self.registry),
            Arc::clone(&self.runner),
            Arc::clone(&self.pose_publisher),
            self.config.global_commands.clone(),
            self.config.checkpoint_path.clone(),
            self.config.checkpoint_interval_s,
            Duration::from_secs(self.config.merge_loop_interval_s.max(1)),
            self.clock.clone(),
            Arc::clone(&self.shutdown),
        );
        let merge_status = merge_loop.status();
        *self.merge_status.lock() = Some(Arc::clone(&merge_status));

        let reporter = StatusReporter::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.blacklist),
            Arc::clone(&self.registry),
            merge_status,
            self.status_publisher.clone(),
            Duration::from_secs(self.config.status_interval_s.max(1)),
            Arc::clone(&self.shutdown),
        );

        let mut threads = self.threads.lock();
        threads.push(thread::spawn(move || merge_loop.run()));
        threads.push(thread::spawn(move || reporter.run()));

        Ok(())
    }

    /// Stop accepting ingest work, signal every background thread, and join
    /// them. The merge loop performs one last checkpoint as it exits, so a
    /// merged map that exists at shutdown is always saved (§6).
    pub fn shutdown(&self) -> MapResult<()> {
        self.shutdown.trigger();
        self.ingest.shutdown();
        for handle in self.threads.lock().drain(..) {
            let _ = handle.join();
        }
        Ok(())
    }

    /// `loadAndProcessSubmap` (§4.2): admit a notification for asynchronous
    /// loading, blacklist-checking, and per-submap command execution.
    pub fn load_and_process_submap(&self, robot_name: RobotId, path: PathBuf) -> MapResult<AdmissionOutcome> {
        self.ingest.load_and_process_submap(robot_name, path)
    }

    /// `deleteMission` (§4.4): resolve a (possibly partial) mission id and
    /// blacklist it. The blacklist is consulted by the merge loop on its
    /// next iteration; this call does not block on that.
    pub fn delete_mission(&self, partial_id: &str) -> MapResult<MissionId> {
        let candidates = self.lookup.known_mission_ids();
        let resolved = resolve_partial_id(partial_id, &candidates).map_err(MapError::invalid_argument)?;
        self.blacklist.insert(resolved.clone(), "operator requested deletion");
        Ok(resolved)
    }

    /// `deleteAllRobotMissions` (§4.4): blacklist every mission ever recorded
    /// for `robot`. Idempotent — missions already blacklisted are a no-op.
    pub fn delete_all_robot_missions(&self, robot: &RobotId) -> usize {
        let missions = self.registry.missions_for_robot(robot);
        for mission in &missions {
            self.blacklist.insert(mission.clone(), "operator requested robot-wide deletion");
        }
        missions.len()
    }

    /// `mapLookup` (§4.5): the read-only query path against the merged map.
    pub fn map_lookup(&self, robot_name: &RobotId, sensor_type: &SensorId, timestamp_ns: i64, p_s: Vec3) -> LookupResult {
        self.lookup.map_lookup(robot_name, sensor_type, timestamp_ns, p_s)
    }

    /// `saveMap` (§6): persist the merged map to an arbitrary path on demand.
    pub fn save_map(&self, path: &Path) -> MapResult<()> {
        self.store.save_map(path, self.clock.epoch_ms())
    }

    /// `visualizeMap` (§6): hand the current merged map snapshot to the
    /// registered visualization publisher, if any data exists yet.
    pub fn visualize_map(&self) -> MapResult<()> {
        let merged = self.store.merged();
        let guard = merged.read();
        let Some(map) = guard.as_ref() else {
            return Err(MapError::not_found("no merged map exists yet"));
        };
        self.visualization_publisher.publish(map);
        Ok(())
    }

    /// A snapshot of the same text the status reporter logs on its own
    /// cadence, computed on demand (e.g. for an admin socket `status`
    /// request) rather than cached from the last periodic tick.
    pub fn status_snapshot(&self) -> String {
        let merge_status = self.merge_status.lock().clone();
        let tracked_robots = self.registry.known_robots();
        render_status_snapshot(&self.queue, &self.blacklist, &self.registry, merge_status.as_deref(), &tracked_robots)
    }
}

impl Server<SystemClock> {
    pub fn new(config: EngineConfig, deps: ServerDeps) -> Self {
        Self::with_clock(config, deps, SystemClock)
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
