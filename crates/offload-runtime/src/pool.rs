//! `OffloadPool` - fixed set of worker threads draining a shared queue
//!
//! All workers start at construction and share one spinlock-guarded queue.
//! Submission pushes a task and returns a handle without blocking; some
//! worker eventually claims the task, runs it, and resumes any contexts
//! suspended on its handle.
//!
//! Queue discipline is newest-first (LIFO): the task pushed last is the
//! one a worker claims next. Callers must not rely on FIFO completion
//! order.

use crate::config::{PoolConfig, ShutdownPolicy};
use offload_core::error::PoolError;
use offload_core::spinlock::SpinLock;
use offload_core::task::{Offloadable, TaskHandle};
use offload_core::{kdebug, kwarn};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// State shared between the pool handle and its workers.
struct PoolShared {
    /// Pending tasks, newest at the tail. Mutated only under the lock.
    queue: SpinLock<Vec<Arc<dyn Offloadable>>>,
    /// Shutdown flag, observed by the worker loops.
    stop: AtomicBool,
    /// Workers currently executing a task.
    ///
    /// Incremented before the claiming pop so a claimed-but-unfinished
    /// task always shows up either here or in the queue - the drain
    /// shutdown depends on that.
    active: AtomicUsize,
    /// Sleep duration for a worker that found the queue empty.
    idle_poll_interval: Duration,
}

/// Fixed pool of worker threads for blocking or CPU-bound work.
///
/// Lifecycle: construct -> submit/wait -> [`shutdown`](Self::shutdown).
/// Fully self-contained; no global registry.
pub struct OffloadPool {
    shared: Arc<PoolShared>,
    /// Taken on the first shutdown; empty afterwards.
    handles: SpinLock<Vec<thread::JoinHandle<()>>>,
    thread_count: usize,
    shutdown_policy: ShutdownPolicy,
}

impl OffloadPool {
    /// Start a pool with the given configuration.
    ///
    /// All worker threads are spawned here; a spawn failure tears down
    /// the workers already started and surfaces as [`PoolError::Spawn`].
    pub fn start(config: PoolConfig) -> Result<Self, PoolError> {
        let thread_count = config.thread_count.max(1);
        let shared = Arc::new(PoolShared {
            queue: SpinLock::new(Vec::new()),
            stop: AtomicBool::new(false),
            active: AtomicUsize::new(0),
            idle_poll_interval: config.idle_poll_interval,
        });

        let mut handles = Vec::with_capacity(thread_count);
        for worker_id in 0..thread_count {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("offload-worker-{}", worker_id))
                .spawn(move || worker_loop(worker_shared, worker_id));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    shared.stop.store(true, Ordering::SeqCst);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Spawn(e.to_string()));
                }
            }
        }

        kdebug!(
            "offload pool started: {} workers, idle poll {:?}",
            thread_count,
            config.idle_poll_interval
        );

        Ok(Self {
            shared,
            handles: SpinLock::new(handles),
            thread_count,
            shutdown_policy: config.shutdown_policy,
        })
    }

    /// Start a pool with default configuration (env overrides apply).
    pub fn start_default() -> Result<Self, PoolError> {
        Self::start(PoolConfig::from_env())
    }

    /// Submit a closure for execution on some worker thread.
    ///
    /// Never blocks and never suspends the caller. The closure and its
    /// captures are moved into the task at this point. Tasks submitted
    /// after shutdown are silently abandoned, like any task the workers
    /// never claim.
    pub fn submit<T, F>(&self, func: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (handle, task) = TaskHandle::new(func);
        self.shared.queue.lock().push(task);
        handle
    }

    /// Stop the pool: set the stop flag and join every worker.
    ///
    /// Idempotent; a second call finds no handles and returns. Queued
    /// tasks not yet claimed are abandoned, never executed - the
    /// "abandon, don't drain" contract. Use
    /// [`shutdown_drain`](Self::shutdown_drain) to run them out first.
    pub fn shutdown(&self) {
        self.shared.stop.store(true, Ordering::SeqCst);

        let handles = std::mem::take(&mut *self.handles.lock());
        if handles.is_empty() {
            return;
        }

        for (worker_id, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                kwarn!("offload-worker-{} join failed", worker_id);
            }
        }

        let abandoned = self.shared.queue.lock().len();
        if abandoned > 0 {
            kdebug!("offload pool shutdown abandoned {} queued task(s)", abandoned);
        }
    }

    /// Draining shutdown: wait until the queue is empty and no worker is
    /// mid-task, then stop.
    ///
    /// Idempotent like [`shutdown`](Self::shutdown): once the stop flag
    /// is set the workers are gone (or going) and nothing will drain the
    /// queue, so the wait is skipped. The caller must not submit
    /// concurrently with the drain, or the wait may never end.
    pub fn shutdown_drain(&self) {
        loop {
            if self.shared.stop.load(Ordering::SeqCst) {
                break;
            }
            let pending = self.shared.queue.lock().len();
            if pending == 0 && self.shared.active.load(Ordering::SeqCst) == 0 {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        self.shutdown();
    }

    /// Number of worker threads started at construction.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Tasks queued but not yet claimed.
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Workers currently executing a task (hint, may be stale).
    pub fn active(&self) -> usize {
        self.shared.active.load(Ordering::Relaxed)
    }
}

impl Drop for OffloadPool {
    fn drop(&mut self) {
        match self.shutdown_policy {
            ShutdownPolicy::Abandon => self.shutdown(),
            ShutdownPolicy::Drain => self.shutdown_drain(),
        }
    }
}

/// Worker thread main loop.
fn worker_loop(shared: Arc<PoolShared>, worker_id: usize) {
    kdebug!("offload-worker-{} started", worker_id);

    while !shared.stop.load(Ordering::Relaxed) {
        // Claim before pop: see the `active` field invariant.
        shared.active.fetch_add(1, Ordering::SeqCst);
        // Guard dropped at the end of the statement - the task runs
        // outside the critical section.
        let task = shared.queue.lock().pop();

        match task {
            Some(task) => {
                task.run();
                shared.active.fetch_sub(1, Ordering::SeqCst);
            }
            None => {
                shared.active.fetch_sub(1, Ordering::SeqCst);
                thread::sleep(shared.idle_poll_interval);
            }
        }
    }

    kdebug!("offload-worker-{} stopped", worker_id);
}
