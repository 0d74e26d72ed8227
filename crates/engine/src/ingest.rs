// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ingest admission (§4.2): `loadAndProcessSubmap` enqueues a notification
//! and dispatches it to a bounded worker pool, which loads the file, checks
//! the blacklist, extracts the latest unoptimized pose, and runs the
//! per-submap command chain.

use crate::blacklist::Blacklist;
use crate::command::CommandRunner;
use crate::queue::{SubmapProcess, SubmapQueue};
use crate::registry::RobotRegistry;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use vimap_core::{MapError, MapHash, MapKey, MapResult, RobotId};
use vimap_storage::{MapStore, SubmapLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    Enqueued,
    DuplicateRejected,
}

/// Shared wiring the pool workers and the admission entrypoint both need.
pub struct IngestContext {
    pub store: Arc<MapStore>,
    pub queue: Arc<SubmapQueue>,
    pub blacklist: Arc<Blacklist>,
    pub registry: Arc<RobotRegistry>,
    pub loader: Arc<dyn SubmapLoader>,
    pub runner: Arc<dyn CommandRunner>,
    pub submap_commands: Vec<String>,
    pub command_fail_fast: bool,
}

/// Bounded worker pool (§2 "Ingest Pool"). Workers pull from a shared
/// channel; `loadAndProcessSubmap` only enqueues the record and sends a
/// handle to the pool, never does the work inline.
pub struct IngestPool {
    sender: Mutex<Option<mpsc::Sender<Arc<SubmapProcess>>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shutting_down: Arc<AtomicBool>,
    ctx: Arc<IngestContext>,
}

impl IngestPool {
    pub fn new(ctx: Arc<IngestContext>) -> Self {
        Self {
            sender: Mutex::new(None),
            workers: Mutex::new(Vec::new()),
            shutting_down: Arc::new(AtomicBool::new(false)),
            ctx,
        }
    }

    /// Spawn `parallelism` workers. Must be called before admission.
    pub fn start(&self, parallelism: usize) {
        let (tx, rx) = mpsc::channel::<Arc<SubmapProcess>>();
        let rx = Arc::new(Mutex::new(rx));
        let mut workers = Vec::with_capacity(parallelism);
        for _ in 0..parallelism.max(1) {
            let rx = Arc::clone(&rx);
            let ctx = Arc::clone(&self.ctx);
            workers.push(thread::spawn(move || worker_loop(rx, ctx)));
        }
        *self.sender.lock() = Some(tx);
        *self.workers.lock() = workers;
    }

    /// §4.2: admit one notification, or reject a duplicate / malformed
    /// input / post-shutdown submission.
    pub fn load_and_process_submap(&self, robot_name: RobotId, path: PathBuf) -> MapResult<AdmissionOutcome> {
        if self.shutting_down.load(Ordering::SeqCst) {
            return Err(MapError::shutting_down());
        }
        if robot_name.as_str().is_empty() {
            return Err(MapError::invalid_argument("robot_name must not be empty"));
        }
        if path.as_os_str().is_empty() {
            return Err(MapError::invalid_argument("submap path must not be empty"));
        }

        let hash = MapHash::from_path(&path);
        if self.ctx.queue.contains_hash(&hash) {
            return Ok(AdmissionOutcome::DuplicateRejected);
        }

        let record = Arc::new(SubmapProcess::new(robot_name, path, hash));
        self.ctx.queue.push(Arc::clone(&record));

        let sender = self.sender.lock();
        if let Some(sender) = sender.as_ref() {
            let _ = sender.send(record);
        }
        Ok(AdmissionOutcome::Enqueued)
    }

    /// Stop accepting new work and join every worker. In-flight tasks run
    /// to completion; queued-but-undispatched tasks are abandoned (§4.1).
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        self.sender.lock().take();
        for worker in self.workers.lock().drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop(rx: Arc<Mutex<mpsc::Receiver<Arc<SubmapProcess>>>>, ctx: Arc<IngestContext>) {
    loop {
        let record = {
            let rx = rx.lock();
            rx.recv()
        };
        match record {
            Ok(record) => process_one(&ctx, &record),
            Err(_) => break,
        }
    }
}

fn process_one(ctx: &IngestContext, record: &Arc<SubmapProcess>) {
    let data = match ctx.loader.load(&record.path) {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!(path = %record.path.display(), %error, "submap load failed");
            ctx.queue.remove(&record.map_hash);
            return;
        }
    };

    let map_key = MapKey::for_submap(&record.map_hash);
    let mission_id = data.mission_id.clone();

    if ctx.blacklist.contains(&mission_id) {
        ctx.queue.remove(&record.map_hash);
        return;
    }

    if let Some((timestamp_ns, t_m_b, t_g_m)) = data.latest_unoptimized_pose() {
        ctx.registry.record_submap(&record.robot_name, &mission_id, timestamp_ns, t_m_b, t_g_m);
    }

    ctx.store.insert_submap(map_key.clone(), data);
    record.mark_loaded(map_key.clone(), mission_id.clone());

    let mut blacklisted_during_commands = false;
    for command in &ctx.submap_commands {
        record.set_current_command(Some(command.clone()));
        if let Err(error) = ctx.runner.run(&map_key, command) {
            tracing::warn!(%command, %error, "submap command failed");
            if ctx.command_fail_fast {
                ctx.blacklist.insert(mission_id.clone(), format!("command failed: {command}"));
                blacklisted_during_commands = true;
                break;
            }
        }
    }
    record.set_current_command(None);

    if blacklisted_during_commands {
        ctx.store.remove_submap(&map_key);
    }
    record.mark_processed();
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
