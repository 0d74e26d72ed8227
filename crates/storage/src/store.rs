// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Map Store: owns every loaded submap and the merged map, keyed by
//! [`MapKey`] (§2). Single-writer per key; the merged map is shared behind
//! an `Arc<RwLock<..>>` so readers (lookups) and the merge loop's writer
//! never interleave mid-mutation.

use crate::checkpoint::Checkpoint;
use crate::map::{MergedMap, SubmapData};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use vimap_core::{MapKey, MapResult};

/// Owns all loaded maps by string key (§2: "Map Store").
pub struct MapStore {
    submaps: RwLock<HashMap<MapKey, Arc<RwLock<SubmapData>>>>,
    merged: Arc<RwLock<Option<MergedMap>>>,
}

impl Default for MapStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MapStore {
    pub fn new() -> Self {
        Self {
            submaps: RwLock::new(HashMap::new()),
            merged: Arc::new(RwLock::new(None)),
        }
    }

    /// Insert a freshly loaded submap under `key`.
    pub fn insert_submap(&self, key: MapKey, data: SubmapData) {
        self.submaps.write().insert(key, Arc::new(RwLock::new(data)));
    }

    /// Handle to a loaded submap's data, for command execution or merging.
    pub fn submap_handle(&self, key: &MapKey) -> Option<Arc<RwLock<SubmapData>>> {
        self.submaps.read().get(key).cloned()
    }

    /// Remove a loaded submap (e.g. after merging, or on load/blacklist failure).
    pub fn remove_submap(&self, key: &MapKey) {
        self.submaps.write().remove(key);
    }

    /// Shared handle to the merged map, for the merge loop's writer and the
    /// lookup service's readers. `None` means the merged map has not been
    /// created yet (or was destroyed after its last mission was removed).
    pub fn merged(&self) -> Arc<RwLock<Option<MergedMap>>> {
        Arc::clone(&self.merged)
    }

    /// Serialize the merged map to `path`, replacing any previous checkpoint
    /// via write-to-temp-then-rename (§4.3 step 5, §6).
    pub fn checkpoint_to(&self, path: &Path, epoch_ms: u64) -> MapResult<()> {
        let guard = self.merged.read();
        let Some(map) = guard.as_ref() else {
            return Ok(());
        };
        Checkpoint::new(map.clone(), epoch_ms).save_atomic(path)
    }

    /// Replace the merged map from a checkpoint file, for recovery on restart.
    pub fn restore_from(&self, path: &Path) -> MapResult<()> {
        let checkpoint = Checkpoint::load(path)?;
        *self.merged.write() = Some(checkpoint.merged_map);
        Ok(())
    }

    /// Persist the merged map to an arbitrary path on demand (`saveMap`, §6).
    pub fn save_map(&self, path: &Path, epoch_ms: u64) -> MapResult<()> {
        self.checkpoint_to(path, epoch_ms)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
