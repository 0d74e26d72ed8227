// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vimap-engine: the Ingest Pool, the single-writer Merge Loop, the Lookup
//! Service, and the Server that wires them together (§2, §4).
//!
//! Ingest runs with bounded parallelism; merging never does (§9). Everything
//! above the Map Store (§3, in `vimap-storage`) lives here.

pub mod blacklist;
pub mod command;
pub mod config;
pub mod ingest;
pub mod lookup;
pub mod merge;
pub mod publishers;
pub mod queue;
pub mod registry;
pub mod server;
pub mod shutdown;
pub mod status;

pub use blacklist::{resolve_partial_id, Blacklist, BlacklistEntry};
pub use command::{CommandRunner, LoggingCommandRunner};
pub use config::EngineConfig;
pub use ingest::{AdmissionOutcome, IngestContext, IngestPool};
pub use lookup::{LookupResult, LookupService, LookupStatus};
pub use merge::{MergeLoop, MergeStatus};
pub use publishers::{
    LoggingPoseCorrectionPublisher, LoggingStatusPublisher, NoopVisualizationPublisher, PoseCorrection,
    PoseCorrectionPublisher, StatusPublisher, VisualizationPublisher,
};
pub use queue::{SubmapProcess, SubmapQueue};
pub use registry::RobotRegistry;
pub use server::{Server, ServerDeps};
pub use shutdown::ShutdownSignal;
pub use status::StatusReporter;
