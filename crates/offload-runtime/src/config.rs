//! Pool configuration
//!
//! Library defaults with runtime environment overrides, builder-style.
//!
//! # Environment Variables
//!
//! - `OFL_THREAD_COUNT` - number of worker threads
//! - `OFL_IDLE_POLL_MS` - idle worker sleep interval in milliseconds
//! - `OFL_DRAIN_ON_SHUTDOWN` - drop-time policy: drain instead of abandon

use offload_core::env::{env_get, env_get_bool};
use std::thread;
use std::time::Duration;

/// What happens to queued-but-unclaimed tasks when the pool goes down.
///
/// `Abandon` is the default and an explicit contract, not an oversight:
/// shutdown does not drain the queue, and an abandoned task's `poll()`
/// stays false forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Stop workers as soon as they finish their current task; queued
    /// tasks never run.
    Abandon,
    /// Keep workers running until the queue is empty, then stop.
    Drain,
}

/// Worker pool configuration with builder pattern.
///
/// `from_env()` starts from library defaults and applies any environment
/// overrides; the builder methods adjust from there.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker threads (default: available hardware parallelism)
    pub thread_count: usize,
    /// Sleep duration when a worker finds the queue empty (default 50 ms)
    pub idle_poll_interval: Duration,
    /// Drop-time shutdown policy (default `Abandon`)
    pub shutdown_policy: ShutdownPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PoolConfig {
    /// Library defaults with environment overrides applied.
    ///
    /// The hardware-parallelism default is read here, once, at
    /// construction time. There is no process-wide mutable state.
    pub fn from_env() -> Self {
        let hw = thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
        let policy = if env_get_bool("OFL_DRAIN_ON_SHUTDOWN", false) {
            ShutdownPolicy::Drain
        } else {
            ShutdownPolicy::Abandon
        };
        Self {
            thread_count: env_get("OFL_THREAD_COUNT", hw).max(1),
            idle_poll_interval: Duration::from_millis(env_get("OFL_IDLE_POLL_MS", 50)),
            shutdown_policy: policy,
        }
    }

    /// Set the number of worker threads (clamped to at least 1)
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = n.max(1);
        self
    }

    /// Set the idle poll interval
    pub fn idle_poll_interval(mut self, interval: Duration) -> Self {
        self.idle_poll_interval = interval;
        self
    }

    /// Set the drop-time shutdown policy
    pub fn shutdown_policy(mut self, policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = policy;
        self
    }
}
