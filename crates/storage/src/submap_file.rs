// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-disk submap file format (§3) and the loader trait the ingest
//! pool uses to turn a path into [`SubmapData`].

use crate::map::{SensorExtrinsics, SubmapData, Vertex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vimap_core::{MapResult, MissionId, SensorId};

/// One sensor's extrinsic calibration entry, as written by the robot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SensorEntry {
    id: SensorId,
    t_b_s: SensorExtrinsics,
}

/// The on-disk JSON shape of a submap file: `{ mission_id, sensors, vertices }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmapFile {
    mission_id: MissionId,
    sensors: Vec<SensorEntry>,
    vertices: Vec<Vertex>,
}

impl SubmapFile {
    pub fn into_data(self) -> SubmapData {
        SubmapData {
            mission_id: self.mission_id,
            sensors: self.sensors.into_iter().map(|s| (s.id, s.t_b_s)).collect(),
            vertices: self.vertices,
        }
    }
}

/// Turns a submap file path into loaded [`SubmapData`]. Abstracted behind a
/// trait so the ingest pool's admission logic can be tested without
/// touching disk.
pub trait SubmapLoader: Send + Sync {
    fn load(&self, path: &Path) -> MapResult<SubmapData>;
}

/// The default loader: reads the path as the JSON submap file format.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSubmapLoader;

impl SubmapLoader for JsonSubmapLoader {
    fn load(&self, path: &Path) -> MapResult<SubmapData> {
        let body = std::fs::read(path)?;
        let file: SubmapFile = serde_json::from_slice(&body)
            .map_err(|e| vimap_core::MapError::io_failure(e.to_string()))?;
        Ok(file.into_data())
    }
}

#[cfg(test)]
#[path = "submap_file_tests.rs"]
mod tests;
