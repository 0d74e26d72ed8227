// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! vimap-storage: the Map Store (§2, §3, §6).
//!
//! Owns every loaded submap and the single merged map, keyed by
//! [`vimap_core::MapKey`]. Single-writer per key; the merged map is exposed
//! through an `Arc<RwLock<..>>` so the merge loop holds the sole writer and
//! lookups take a read lock that never observes an intermediate state.

pub mod checkpoint;
pub mod map;
pub mod store;
pub mod submap_file;

pub use checkpoint::{Checkpoint, CURRENT_CHECKPOINT_VERSION};
pub use map::{MergedMap, Mission, SensorExtrinsics, SubmapData, Vertex};
pub use store::MapStore;
pub use submap_file::{JsonSubmapLoader, SubmapFile, SubmapLoader};
