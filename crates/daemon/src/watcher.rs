// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The filesystem submap watcher (§6): polls `submap_watch_dir` on an
//! interval rather than relying on inotify-class OS events, since those are
//! not guaranteed across every deployment target (e.g. a shared network
//! filesystem). Built on `notify::PollWatcher`, which already implements
//! interval-based directory scanning, instead of hand-rolling one.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, EventKind, PollWatcher, RecursiveMode, Watcher};
use vimap_core::RobotId;
use vimap_engine::Server;

/// Parse `<robot_name>__<anything>.json` into a robot name, falling back to
/// `default_robot_name` when the separator is absent.
pub fn robot_name_from_filename(path: &Path, default_robot_name: &str) -> RobotId {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    match stem.split_once("__") {
        Some((robot, _)) if !robot.is_empty() => RobotId::new(robot),
        _ => RobotId::new(default_robot_name),
    }
}

/// Run the polling watcher until `shutdown` fires. `server` is notified via
/// `load_and_process_submap` for every file seen for the first time; a file
/// already observed is never re-notified even if modified in place, since a
/// submap file is written once and never updated.
pub fn run<C: vimap_core::Clock + 'static>(
    server: Arc<Server<C>>,
    watch_dir: PathBuf,
    poll_interval: Duration,
    default_robot_name: String,
    shutdown: Arc<vimap_engine::ShutdownSignal>,
) -> notify::Result<()> {
    std::fs::create_dir_all(&watch_dir)?;

    let (tx, rx) = mpsc::channel();
    let config = Config::default().with_poll_interval(poll_interval);
    let mut watcher = PollWatcher::new(tx, config)?;
    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

    let mut seen: HashSet<PathBuf> = HashSet::new();
    for entry in std::fs::read_dir(&watch_dir)?.flatten() {
        seen.insert(entry.path());
    }

    while !shutdown.is_set() {
        match rx.recv_timeout(poll_interval) {
            Ok(Ok(event)) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    continue;
                }
                for path in event.paths {
                    if !seen.insert(path.clone()) {
                        continue;
                    }
                    let robot_name = robot_name_from_filename(&path, &default_robot_name);
                    match server.load_and_process_submap(robot_name.clone(), path.clone()) {
                        Ok(outcome) => tracing::info!(?path, %robot_name, ?outcome, "submap observed by watcher"),
                        Err(err) => tracing::warn!(?path, %robot_name, %err, "watcher failed to admit submap"),
                    }
                }
            }
            Ok(Err(err)) => tracing::warn!(%err, "submap watcher error"),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
