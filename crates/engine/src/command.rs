// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Command Runner (§6): executes a named textual command against a map
//! key. Opaque to the engine — the actual command interpreter is out of
//! scope (§1 Non-goals); this is the seam production deployments fill in.

use vimap_core::{MapKey, MapResult};

pub trait CommandRunner: Send + Sync {
    fn run(&self, map_key: &MapKey, command: &str) -> MapResult<()>;
}

/// Default runner for tests and demos: logs the command and always
/// succeeds. Production deployments supply their own [`CommandRunner`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCommandRunner;

impl CommandRunner for LoggingCommandRunner {
    fn run(&self, map_key: &MapKey, command: &str) -> MapResult<()> {
        tracing::info!(%map_key, %command, "running map command");
        Ok(())
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
