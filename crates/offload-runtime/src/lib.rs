//! # offload-runtime
//!
//! OS-thread machinery for the offload core: the fixed worker pool, its
//! configuration, the parking primitive used to sleep and wake threads,
//! and a suspension bridge for callers that are plain OS threads.
//!
//! ## Modules
//!
//! - `pool` - Fixed worker pool draining the shared LIFO queue
//! - `config` - Pool configuration with environment overrides
//! - `parking` - Single-permit park/unpark cell (futex on Linux)
//! - `bridge` - Blocking suspension bridge for non-reactor callers

pub mod bridge;
pub mod config;
pub mod parking;
pub mod pool;

pub use bridge::{BlockingBridge, BlockingWaitHandle};
pub use config::{PoolConfig, ShutdownPolicy};
pub use parking::ParkCell;
pub use pool::OffloadPool;
