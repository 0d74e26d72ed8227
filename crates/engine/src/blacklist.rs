// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The blacklist: missions scheduled for deletion (§3, §4.4).
//!
//! Entries are monotonic once inserted — a blacklist entry is never
//! removed, since it must keep filtering future submaps for that mission
//! forever (§4.3 step 1).

use parking_lot::RwLock;
use std::collections::HashMap;
use vimap_core::MissionId;

#[derive(Debug, Clone)]
pub struct BlacklistEntry {
    pub mission_id: MissionId,
    pub reason: String,
}

#[derive(Default)]
pub struct Blacklist {
    entries: RwLock<HashMap<MissionId, String>>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `mission` with `reason`, unless it is already blacklisted
    /// (idempotent, matching `deleteAllRobotMissions`'s contract).
    pub fn insert(&self, mission: MissionId, reason: impl Into<String>) {
        self.entries.write().entry(mission).or_insert_with(|| reason.into());
    }

    pub fn contains(&self, mission: &MissionId) -> bool {
        self.entries.read().contains_key(mission)
    }

    pub fn entries(&self) -> Vec<BlacklistEntry> {
        self.entries
            .read()
            .iter()
            .map(|(mission_id, reason)| BlacklistEntry {
                mission_id: mission_id.clone(),
                reason: reason.clone(),
            })
            .collect()
    }
}

/// Resolve a (possibly partial, minimum 4 characters) mission id against a
/// known set of candidates (§4.4, §9's canonical-form design note: byte-for-
/// byte prefix comparison, no normalization).
pub fn resolve_partial_id(partial: &str, candidates: &[MissionId]) -> Result<MissionId, String> {
    if partial.len() < 4 {
        return Err(format!("partial mission id {partial:?} is shorter than 4 characters"));
    }
    let matches: Vec<&MissionId> = candidates.iter().filter(|m| m.as_str().starts_with(partial)).collect();
    match matches.as_slice() {
        [] => Err(format!("no mission matches {partial:?}")),
        [single] => Ok((*single).clone()),
        _ => Err(format!("{partial:?} matches more than one mission")),
    }
}

#[cfg(test)]
#[path = "blacklist_tests.rs"]
mod tests;
