// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML-deserialized daemon configuration (§6): everything `EngineConfig`
//! needs plus the watcher and admin socket settings that only the daemon
//! binary cares about. Centralizing defaults here mirrors how the daemon's
//! environment helpers keep `OJ_*`-derived defaults in one place.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use vimap_core::SensorId;
use vimap_engine::EngineConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Directory a producer drops new submap files into.
    pub submap_watch_dir: PathBuf,
    /// Polling interval for the submap watcher, in milliseconds.
    pub submap_watch_interval_ms: u64,
    /// Robot name used when a dropped filename doesn't encode one.
    pub default_robot_name: String,
    /// Unix socket path the admin listener binds.
    pub admin_socket_path: PathBuf,
    /// Where the merge loop checkpoints the merged map.
    pub checkpoint_path: PathBuf,
    pub checkpoint_interval_s: u64,
    pub status_interval_s: u64,
    pub merge_loop_interval_s: u64,
    pub ingest_parallelism: usize,
    pub command_fail_fast: bool,
    pub submap_commands: Vec<String>,
    pub global_commands: Vec<String>,
    /// Restrict `mapLookup` to these sensors; empty means no restriction.
    pub lookup_sensor_whitelist: Vec<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            submap_watch_dir: PathBuf::from("/var/lib/vimap/submaps"),
            submap_watch_interval_ms: 1000,
            default_robot_name: "unknown".to_string(),
            admin_socket_path: PathBuf::from("/var/run/vimap/admin.sock"),
            checkpoint_path: PathBuf::from("/var/lib/vimap/checkpoint.json"),
            checkpoint_interval_s: 300,
            status_interval_s: 30,
            merge_loop_interval_s: 1,
            ingest_parallelism: 4,
            command_fail_fast: false,
            submap_commands: Vec::new(),
            global_commands: Vec::new(),
            lookup_sensor_whitelist: Vec::new(),
        }
    }
}

impl DaemonConfig {
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::new(self.checkpoint_path.clone())
            .submap_commands(self.submap_commands.clone())
            .global_commands(self.global_commands.clone())
            .ingest_parallelism(self.ingest_parallelism)
            .checkpoint_interval_s(self.checkpoint_interval_s)
            .status_interval_s(self.status_interval_s)
            .command_fail_fast(self.command_fail_fast)
            .merge_loop_interval_s(self.merge_loop_interval_s);
        if !self.lookup_sensor_whitelist.is_empty() {
            let whitelist = self.lookup_sensor_whitelist.iter().map(SensorId::new).collect::<std::collections::HashSet<_>>();
            config = config.lookup_sensor_whitelist(whitelist);
        }
        config
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
