//! # offload-core
//!
//! Core types and traits for the offload pool.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! Thread spawning, parking and the worker pool live in `offload-runtime`.
//!
//! ## Modules
//!
//! - `spinlock` - Busy-wait lock guarding the shared work queue
//! - `task` - Deferred work unit: closure + completion flag + outcome slot
//! - `bridge` - Suspension bridge traits (reactor-side contract)
//! - `error` - Error types
//! - `kprint` - Kernel-style debug printing macros
//! - `env` - Environment variable utilities

#![allow(dead_code)]

pub mod bridge;
pub mod env;
pub mod error;
pub mod kprint;
pub mod spinlock;
pub mod task;

// Re-exports for convenience
pub use bridge::{SuspendBridge, WaitHandle};
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};
pub use error::{PoolError, TaskError, TaskResult};
pub use kprint::{init as init_logging, set_flush_enabled, set_log_level, LogLevel};
pub use spinlock::{SpinLock, SpinLockGuard};
pub use task::{Offloadable, TaskHandle, TaskInner};
