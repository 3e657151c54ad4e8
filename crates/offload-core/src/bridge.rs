//! Suspension bridge traits
//!
//! The pool never blocks a reactor: when a context awaits an unfinished
//! task it suspends through this bridge, and the worker that completes the
//! task resumes it. The contract is deliberately narrow - "give me a wait
//! handle" and "resume this wait handle" - so any host can implement it:
//! a cooperative reactor, or a plain OS thread that parks itself.
//!
//! # Implementors
//!
//! - `offload_runtime::BlockingBridge`: suspends by parking the calling
//!   OS thread. For callers that are not multiplexed by a reactor.
//!
//! - `offload_reactor::ReactorCtx`: suspends the current execution context
//!   and hands control back to the reactor loop; resume re-readies the
//!   context from whichever worker thread completed the task.

use std::sync::Arc;

/// One suspended execution context waiting on a task.
///
/// **Contract:**
/// - `resume()` must NEVER block.
/// - `resume()` is callable from any OS thread.
/// - A resume delivered before the matching suspend must not be lost:
///   the next suspend on this handle returns immediately (permit
///   semantics). This is what makes the register-then-recheck dance in
///   `TaskHandle::wait` race-free.
/// - Spurious resumes are allowed; waiters re-check completion and
///   suspend again.
pub trait WaitHandle: Send + Sync {
    /// Resume the context this handle belongs to.
    fn resume(&self);
}

/// The suspend side of the bridge, implemented by whatever hosts the
/// awaiting execution context.
pub trait SuspendBridge {
    /// The resumable half, shared with the completing worker.
    type Handle: WaitHandle + 'static;

    /// Create a wait handle tied to the current execution context.
    fn wait_handle(&self) -> Arc<Self::Handle>;

    /// Suspend the current execution context until `handle` is resumed.
    ///
    /// May return spuriously; callers loop on their own condition.
    fn suspend(&self, handle: &Self::Handle);
}
