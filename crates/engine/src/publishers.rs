// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Callback interfaces the merge loop and status reporter publish through
//! (§6, §9). Modeled as single-method traits rather than boxed closures so
//! tests can inject fakes that record calls (§9 design note).

use vimap_core::{RobotId, Transform};
use vimap_storage::MergedMap;

/// One robot's re-anchoring correction, emitted by the merge loop (§4.3
/// step 4).
#[derive(Debug, Clone, Copy)]
pub struct PoseCorrection {
    pub timestamp_ns: i64,
    pub t_m_b_old: Transform,
    pub t_g_m_old: Transform,
    pub t_g_b_new: Transform,
    pub t_b_old_b_new: Transform,
}

pub trait PoseCorrectionPublisher: Send + Sync {
    fn publish(&self, robot_name: &RobotId, correction: &PoseCorrection);
}

pub trait StatusPublisher: Send + Sync {
    fn publish(&self, status: &str);
}

/// `visualizeMap` (§6): no rendering is implemented (§1 Non-goals), but the
/// seam is modeled the same way as the other callbacks.
pub trait VisualizationPublisher: Send + Sync {
    fn publish(&self, snapshot: &MergedMap);
}

/// Logging defaults so the node is observable with zero external wiring
/// (§2 ambient collaborators); socket/bus-backed publishers layer on top.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPoseCorrectionPublisher;

impl PoseCorrectionPublisher for LoggingPoseCorrectionPublisher {
    fn publish(&self, robot_name: &RobotId, correction: &PoseCorrection) {
        tracing::info!(
            robot = %robot_name,
            t_star = correction.timestamp_ns,
            "pose correction computed"
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingStatusPublisher;

impl StatusPublisher for LoggingStatusPublisher {
    fn publish(&self, status: &str) {
        tracing::info!(%status, "status tick");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopVisualizationPublisher;

impl VisualizationPublisher for NoopVisualizationPublisher {
    fn publish(&self, snapshot: &MergedMap) {
        tracing::debug!(missions = snapshot.mission_ids().count(), "visualization snapshot requested");
    }
}

#[cfg(test)]
#[path = "publishers_tests.rs"]
mod tests;
