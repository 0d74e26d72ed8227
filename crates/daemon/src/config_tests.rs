// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_cover_every_field_without_a_config_file() {
    let config = DaemonConfig::default();
    assert_eq!(config.submap_watch_interval_ms, 1000);
    assert_eq!(config.default_robot_name, "unknown");
    assert_eq!(config.ingest_parallelism, 4);
}

#[test]
fn partial_toml_falls_back_to_defaults_for_missing_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("vimapd.toml");
    std::fs::write(
        &path,
        r#"
        submap_watch_dir = "/data/submaps"
        admin_socket_path = "/tmp/vimap.sock"
        checkpoint_path = "/tmp/checkpoint.json"
        "#,
    )
    .expect("write config");

    let config = DaemonConfig::load(&path).expect("parses");
    assert_eq!(config.submap_watch_dir, std::path::PathBuf::from("/data/submaps"));
    assert_eq!(config.submap_watch_interval_ms, 1000);
    assert_eq!(config.checkpoint_interval_s, 300);
}

#[test]
fn unreadable_path_is_a_read_error() {
    let err = DaemonConfig::load(std::path::Path::new("/nonexistent/vimapd.toml")).expect_err("missing file");
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "not valid = [").expect("write");
    let err = DaemonConfig::load(&path).expect_err("malformed");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn engine_config_carries_the_lookup_whitelist_when_set() {
    let mut config = DaemonConfig::default();
    config.lookup_sensor_whitelist = vec!["cam0".to_string(), "lidar".to_string()];
    let engine_config = config.engine_config();
    let whitelist = engine_config.lookup_sensor_whitelist.expect("whitelist set");
    assert_eq!(whitelist.len(), 2);
}

#[test]
fn engine_config_leaves_the_whitelist_unset_when_empty() {
    let config = DaemonConfig::default();
    let engine_config = config.engine_config();
    assert!(engine_config.lookup_sensor_whitelist.is_none());
}
