// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration frozen at [`crate::Server::start`] (§3).

use std::collections::HashSet;
use std::path::PathBuf;
use vimap_core::SensorId;

/// Options recognized by the engine. Every field is immutable once `start()`
/// has been called; there is no dynamic reconfiguration (§1 Non-goals).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub submap_commands: Vec<String>,
    pub global_commands: Vec<String>,
    pub ingest_parallelism: usize,
    pub checkpoint_interval_s: u64,
    pub checkpoint_path: PathBuf,
    pub status_interval_s: u64,
    pub lookup_sensor_whitelist: Option<HashSet<SensorId>>,
    /// §4.2(d) policy knob: escalate a failed per-submap command to a
    /// mission blacklist instead of merging the submap anyway.
    pub command_fail_fast: bool,
    /// Cadence of the merge loop's own iteration sleep (§4.3 step 6).
    pub merge_loop_interval_s: u64,
}

impl EngineConfig {
    pub fn new(checkpoint_path: impl Into<PathBuf>) -> Self {
        Self {
            submap_commands: Vec::new(),
            global_commands: Vec::new(),
            ingest_parallelism: 4,
            checkpoint_interval_s: 300,
            checkpoint_path: checkpoint_path.into(),
            status_interval_s: 30,
            lookup_sensor_whitelist: None,
            command_fail_fast: false,
            merge_loop_interval_s: 1,
        }
    }

    vimap_core::setters! {
        into {
            submap_commands: Vec<String>,
            global_commands: Vec<String>,
        }
        set {
            ingest_parallelism: usize,
            checkpoint_interval_s: u64,
            status_interval_s: u64,
            command_fail_fast: bool,
            merge_loop_interval_s: u64,
        }
        option {
            lookup_sensor_whitelist: HashSet<SensorId>,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
