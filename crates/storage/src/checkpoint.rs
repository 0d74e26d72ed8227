// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checkpoint persistence for the merged map (§4.3 step 5, §6).
//!
//! A checkpoint is the complete merged map at a point in time. It is
//! written to a temporary sibling file and renamed into place so a reader
//! (or a crashed write) never observes a half-written checkpoint.

use crate::map::MergedMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vimap_core::MapResult;

/// Current checkpoint schema version.
pub const CURRENT_CHECKPOINT_VERSION: u32 = 1;

/// A checkpoint of the merged map at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(rename = "v")]
    pub version: u32,
    pub created_at_epoch_ms: u64,
    pub merged_map: MergedMap,
}

impl Checkpoint {
    pub fn new(merged_map: MergedMap, created_at_epoch_ms: u64) -> Self {
        Self {
            version: CURRENT_CHECKPOINT_VERSION,
            created_at_epoch_ms,
            merged_map,
        }
    }

    /// Write this checkpoint to `path`, replacing any existing file
    /// atomically by writing to a `.tmp` sibling and renaming over it.
    pub fn save_atomic(&self, path: &Path) -> MapResult<()> {
        let tmp_path = path.with_extension("tmp");
        let body = serde_json::to_vec_pretty(self)
            .map_err(|e| vimap_core::MapError::io_failure(e.to_string()))?;
        std::fs::write(&tmp_path, body)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load a checkpoint previously written by [`Checkpoint::save_atomic`].
    pub fn load(path: &Path) -> MapResult<Self> {
        let body = std::fs::read(path)?;
        serde_json::from_slice(&body).map_err(|e| vimap_core::MapError::io_failure(e.to_string()))
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
