//! # offload - blocking work off a cooperative reactor
//!
//! A fixed pool of worker threads takes blocking or CPU-bound closures
//! off a single-threaded cooperative reactor. Submission returns a handle
//! immediately; awaiting the handle suspends only the calling execution
//! context, never the reactor thread or sibling contexts.
//!
//! ## Quick Start
//!
//! ```ignore
//! use offload::{OffloadPool, PoolConfig, Reactor};
//!
//! fn main() {
//!     let pool = OffloadPool::start(PoolConfig::default()).unwrap();
//!     let mut reactor = Reactor::new();
//!
//!     let handle = pool.submit(|| slow_io_bound_thing());
//!     reactor.spawn(move |ctx| {
//!         // Suspends this context; the reactor keeps running others
//!         match handle.wait(ctx) {
//!             Ok(value) => println!("got {}", value),
//!             Err(e) => println!("task failed: {}", e),
//!         }
//!     });
//!
//!     reactor.run();
//!     pool.shutdown();
//! }
//! ```
//!
//! Plain OS threads (no reactor) await with
//! [`BlockingBridge`](offload_runtime::BlockingBridge) instead.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │            Execution contexts (cooperative)               │
//! │     submit() → TaskHandle      wait() → suspend           │
//! └───────────────────────────┬───────────────────────────────┘
//!                             │ spinlock-guarded LIFO queue
//!          ┌──────────────────┼──────────────────┐
//!          ▼                  ▼                  ▼
//!    ┌───────────┐      ┌───────────┐      ┌───────────┐
//!    │  Worker   │      │  Worker   │      │  Worker   │
//!    │  Thread   │      │  Thread   │      │  Thread   │
//!    └─────┬─────┘      └─────┬─────┘      └─────┬─────┘
//!          │  outcome + completion flag + resume │
//!          └─────────────► waiters ◄─────────────┘
//! ```

// Re-export core types
pub use offload_core::{
    Offloadable, PoolError, SpinLock, SpinLockGuard, SuspendBridge, TaskError, TaskHandle,
    TaskResult, WaitHandle,
};

// Re-export kprint macros for debug logging
pub use offload_core::{kdebug, kerror, kinfo, kprint, kprintln, ktrace, kwarn};
pub use offload_core::{init_logging, set_flush_enabled, set_log_level, LogLevel};

// Re-export env utilities
pub use offload_core::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};

// Re-export runtime types
pub use offload_runtime::{BlockingBridge, OffloadPool, ParkCell, PoolConfig, ShutdownPolicy};

// Re-export the reactor harness
pub use offload_reactor::{Reactor, ReactorCtx, ReactorWaitHandle};
