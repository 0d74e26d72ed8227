// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Status Reporter (§4.6): periodically builds a textual snapshot of
//! the queue, merge loop, blacklist, and per-robot mission chains. Local
//! logging always happens on each tick regardless of whether a status
//! callback is registered (§9 resolved open question).

use crate::blacklist::Blacklist;
use crate::merge::MergeStatus;
use crate::publishers::StatusPublisher;
use crate::queue::SubmapQueue;
use crate::registry::RobotRegistry;
use crate::shutdown::ShutdownSignal;
use vimap_core::RobotId;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

pub struct StatusReporter {
    queue: Arc<SubmapQueue>,
    blacklist: Arc<Blacklist>,
    registry: Arc<RobotRegistry>,
    merge_status: Arc<MergeStatus>,
    publisher: Option<Arc<dyn StatusPublisher>>,
    interval: Duration,
    shutdown: Arc<ShutdownSignal>,
}

impl StatusReporter {
    pub fn new(
        queue: Arc<SubmapQueue>,
        blacklist: Arc<Blacklist>,
        registry: Arc<RobotRegistry>,
        merge_status: Arc<MergeStatus>,
        publisher: Option<Arc<dyn StatusPublisher>>,
        interval: Duration,
        shutdown: Arc<ShutdownSignal>,
    ) -> Self {
        Self { queue, blacklist, registry, merge_status, publisher, interval, shutdown }
    }

    pub fn run(&self) {
        loop {
            if self.shutdown.is_set() {
                break;
            }
            let snapshot = self.build_snapshot();
            tracing::info!(%snapshot, "status tick");
            if let Some(publisher) = &self.publisher {
                publisher.publish(&snapshot);
            }
            if self.shutdown.is_set() {
                break;
            }
            self.shutdown.sleep(self.interval);
        }
    }

    fn build_snapshot(&self) -> String {
        let tracked = self.registry.known_robots();
        render_status_snapshot(&self.queue, &self.blacklist, &self.registry, Some(&self.merge_status), &tracked)
    }
}

/// Render the same textual report the periodic reporter logs, for either a
/// scheduled tick or an on-demand query (`Server::status_snapshot`).
/// `merge_status` is `None` before the merge loop has started.
pub fn render_status_snapshot(
    queue: &SubmapQueue,
    blacklist: &Blacklist,
    registry: &RobotRegistry,
    merge_status: Option<&MergeStatus>,
    tracked_robots: &[RobotId],
) -> String {
    let mut out = String::new();
    let records = queue.snapshot();
    let _ = write!(out, "queue_len={} ", records.len());
    for record in &records {
        let _ = write!(
            out,
            "[hash={} loaded={} processed={} merged={} command={}] ",
            record.map_hash,
            record.is_loaded(),
            record.is_processed(),
            record.is_merged(),
            record.current_command().unwrap_or_else(|| "-".to_string()),
        );
    }

    match merge_status {
        Some(status) => {
            let _ = write!(
                out,
                "merge_busy={} current_merge_command={} duration_last_merging_loop_s={:.3} ",
                status.is_busy(),
                status.current_command().unwrap_or_else(|| "-".to_string()),
                status.duration_last_loop_s(),
            );
        }
        None => {
            let _ = write!(out, "merge_busy=false current_merge_command=- duration_last_merging_loop_s=0.000 ");
        }
    }

    let _ = write!(out, "blacklist=[");
    for entry in blacklist.entries() {
        let _ = write!(out, "{}:{} ", entry.mission_id, entry.reason);
    }
    let _ = write!(out, "] ");

    let _ = write!(out, "robots=[");
    for robot in tracked_robots {
        let chain: Vec<String> = registry.missions_for_robot(robot).iter().map(|m| m.to_string()).collect();
        let _ = write!(out, "{}:{} ", robot, chain.join(">"));
    }
    let _ = write!(out, "]");

    out
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
