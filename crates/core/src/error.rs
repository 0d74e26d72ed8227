// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error taxonomy shared by every public operation (§7).
//!
//! Every externally-visible operation returns a [`MapResult`]. The
//! [`ErrorKind`] lets callers (including the admin socket) match on failure
//! class without parsing messages.

use thiserror::Error;

/// Coarse failure classes, matching §7 one-for-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed robot name, path, partial id too short, ambiguous partial id.
    InvalidArgument,
    /// Lookup mission/sensor missing, deletion target missing.
    NotFound,
    /// `kPoseNotAvailableYet` — caller should retry.
    TransientUnavailable,
    /// `kPoseNeverAvailable` — will never succeed for this input.
    Terminal,
    /// A per-submap or global command failed.
    CommandFailed,
    /// Submap load, checkpoint write, or map delete failed.
    IoFailure,
    /// Ingest rejected after shutdown was requested.
    ShuttingDown,
}

crate::simple_display! {
    ErrorKind {
        InvalidArgument => "invalid_argument",
        NotFound => "not_found",
        TransientUnavailable => "transient_unavailable",
        Terminal => "terminal",
        CommandFailed => "command_failed",
        IoFailure => "io_failure",
        ShuttingDown => "shutting_down",
    }
}

/// An error from a public operation: a [`ErrorKind`] plus a human-readable message.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct MapError {
    pub kind: ErrorKind,
    pub message: String,
}

impl MapError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn io_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IoFailure, message)
    }

    pub fn shutting_down() -> Self {
        Self::new(ErrorKind::ShuttingDown, "server is shutting down")
    }
}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::io_failure(err.to_string())
    }
}

pub type MapResult<T> = std::result::Result<T, MapError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
