// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative cancellation (§5, §4.3 ambient addition): every long-running
//! thread polls [`ShutdownSignal::is_set`] at suspension points, and the
//! inter-iteration sleep is an interruptible condition-variable wait rather
//! than a plain `sleep`, so `shutdown()` does not wait out a full idle
//! period before joining.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct ShutdownSignal {
    flag: AtomicBool,
    gate: Mutex<()>,
    condvar: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Set the flag and wake every thread parked in [`Self::sleep`].
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let _guard = self.gate.lock();
        self.condvar.notify_all();
    }

    /// Sleep for `duration`, or until [`Self::trigger`] is called, whichever
    /// comes first. Returns immediately if already triggered.
    pub fn sleep(&self, duration: Duration) {
        if self.is_set() {
            return;
        }
        let mut guard = self.gate.lock();
        if !self.is_set() {
            self.condvar.wait_for(&mut guard, duration);
        }
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
