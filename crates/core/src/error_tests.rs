// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn display_includes_kind_and_message() {
    let err = MapError::not_found("mission abc123 not found");
    assert_eq!(err.to_string(), "not_found: mission abc123 not found");
}

#[test]
fn kind_display_matches_wire_form() {
    assert_eq!(ErrorKind::TransientUnavailable.to_string(), "transient_unavailable");
    assert_eq!(ErrorKind::ShuttingDown.to_string(), "shutting_down");
}

#[test]
fn shutting_down_constructor_sets_kind() {
    let err = MapError::shutting_down();
    assert_eq!(err.kind, ErrorKind::ShuttingDown);
}
