// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn robot_name_is_parsed_from_the_double_underscore_prefix() {
    let path = Path::new("/data/submaps/r1__2026-08-01T00-00-00.json");
    assert_eq!(robot_name_from_filename(path, "fallback"), RobotId::new("r1"));
}

#[test]
fn robot_name_falls_back_when_separator_is_absent() {
    let path = Path::new("/data/submaps/s1.json");
    assert_eq!(robot_name_from_filename(path, "fallback"), RobotId::new("fallback"));
}

#[test]
fn robot_name_falls_back_when_the_prefix_before_the_separator_is_empty() {
    let path = Path::new("/data/submaps/__2026-08-01.json");
    assert_eq!(robot_name_from_filename(path, "fallback"), RobotId::new("fallback"));
}
