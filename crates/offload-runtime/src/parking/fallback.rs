//! Condvar-based park cell
//!
//! Portable fallback for platforms without futex support. Less efficient
//! but identical permit semantics.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Condvar-backed single-permit cell
pub struct CondvarCell {
    /// true = permit stored
    permit: Mutex<bool>,
    condvar: Condvar,
}

impl CondvarCell {
    pub fn new() -> Self {
        Self {
            permit: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Consume a permit, sleeping until one arrives.
    pub fn park(&self) {
        let mut permit = self.permit.lock().unwrap();
        while !*permit {
            permit = self.condvar.wait(permit).unwrap();
        }
        *permit = false;
    }

    /// Consume a permit, sleeping at most `timeout`.
    ///
    /// Returns true iff a permit was consumed.
    pub fn park_timeout(&self, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        let mut permit = self.permit.lock().unwrap();
        while !*permit {
            let now = std::time::Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .condvar
                .wait_timeout(permit, deadline - now)
                .unwrap();
            permit = guard;
        }
        *permit = false;
        true
    }

    /// Store the permit and wake a sleeper.
    pub fn unpark(&self) {
        let mut permit = self.permit.lock().unwrap();
        *permit = true;
        drop(permit);
        self.condvar.notify_one();
    }
}

impl Default for CondvarCell {
    fn default() -> Self {
        Self::new()
    }
}
