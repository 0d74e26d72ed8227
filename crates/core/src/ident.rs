// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes used throughout the mapping server.

use sha2::{Digest, Sha256};

crate::define_ident! {
    /// Opaque robot identifier, as given by the notification source.
    pub struct RobotId;
}

crate::define_ident! {
    /// Mission identifier, read from a submap's contents. Comparisons and
    /// prefix resolution are byte-for-byte on this canonical form — no
    /// normalization is applied.
    pub struct MissionId;
}

crate::define_ident! {
    /// Sensor identifier, read from a submap's sensor table.
    pub struct SensorId;
}

crate::define_ident! {
    /// Key under which a map is stored in the Map Store.
    pub struct MapKey;
}

crate::define_ident! {
    /// Stable identifier for a submap, derived from its on-disk path.
    ///
    /// Used for duplicate-notification detection, status reporting, and
    /// tagging per-submap commands. Two notifications for the same path
    /// always produce the same hash.
    pub struct MapHash;
}

impl MapHash {
    /// Derive a `MapHash` from a submap's on-disk path.
    pub fn from_path(path: &std::path::Path) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(path.to_string_lossy().as_bytes());
        let digest = hasher.finalize();
        Self(hex_prefix(&digest, 16))
    }
}

fn hex_prefix(bytes: &[u8], chars: usize) -> String {
    let mut s = String::with_capacity(chars);
    for b in bytes {
        if s.len() >= chars {
            break;
        }
        s.push_str(&format!("{:02x}", b));
    }
    s.truncate(chars);
    s
}

impl MapKey {
    /// The well-known key under which the merged map lives in the Map Store.
    pub fn merged() -> Self {
        Self("merged_map".to_string())
    }

    /// Fresh key for a submap loaded under the given hash.
    pub fn for_submap(hash: &MapHash) -> Self {
        Self(format!("submap_{}", hash.as_str()))
    }
}

#[cfg(test)]
#[path = "ident_tests.rs"]
mod tests;
