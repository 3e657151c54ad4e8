//! Deferred work unit: closure + completion flag + outcome slot
//!
//! A task is created at submission time and shared three ways: the
//! submitter holds a [`TaskHandle`], the pool's queue holds the type-erased
//! [`Offloadable`], and eventually one worker thread runs it. The closure
//! and its captures are owned by the task from the moment of submission -
//! never borrowed from the caller - because the worker runs at an
//! arbitrary later time on an unrelated thread.
//!
//! Completion ordering: the outcome slot is written strictly before the
//! `done` flag is stored with `Release`; any thread that observes
//! `done == true` through an `Acquire` load therefore sees the outcome.
//! The flag transitions pending -> done exactly once and never reverts.

use crate::bridge::{SuspendBridge, WaitHandle};
use crate::error::{TaskError, TaskResult};
use crate::kdebug;
use crate::spinlock::SpinLock;

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Type-erased view of a task, as held by the pool's work queue.
pub trait Offloadable: Send + Sync {
    /// Execute the task. Fully contains any panic from the closure.
    fn run(&self);

    /// Non-blocking completion check. Safe from any thread.
    fn is_finished(&self) -> bool;
}

type BoxedWork<T> = Box<dyn FnOnce() -> T + Send>;

/// Shared state of one submitted task.
pub struct TaskInner<T> {
    /// The closure, taken exactly once by the executing worker.
    func: SpinLock<Option<BoxedWork<T>>>,

    /// Value or captured failure, written exactly once.
    outcome: SpinLock<Option<TaskResult<T>>>,

    /// pending -> done, exactly once. Release-paired with `outcome`.
    done: AtomicBool,

    /// Contexts suspended on this task; drained and resumed on completion.
    waiters: SpinLock<Vec<Arc<dyn WaitHandle>>>,
}

impl<T: Send> TaskInner<T> {
    fn new(func: BoxedWork<T>) -> Self {
        Self {
            func: SpinLock::new(Some(func)),
            outcome: SpinLock::new(None),
            done: AtomicBool::new(false),
            waiters: SpinLock::new(Vec::new()),
        }
    }

    #[inline]
    fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Register a suspended context to be resumed on completion.
    ///
    /// If the task completes concurrently, either the drain in
    /// [`execute`](Self::execute) picks the handle up, or the caller's
    /// re-check of the flag observes done - registration is never a
    /// lost wake.
    fn add_waiter(&self, handle: Arc<dyn WaitHandle>) {
        self.waiters.lock().push(handle);
    }

    /// Run the closure, store the outcome, flip the flag, resume waiters.
    ///
    /// Never unwinds: a panicking closure is captured as
    /// [`TaskError::Failed`] and replayed through the handle instead.
    /// A second call is a no-op (the closure slot is empty).
    fn execute(&self) {
        let func = self.func.lock().take();
        let func = match func {
            Some(f) => f,
            None => return,
        };

        let outcome = match catch_unwind(AssertUnwindSafe(func)) {
            Ok(value) => Ok(value),
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                kdebug!("offload task failed: {}", msg);
                Err(TaskError::Failed(msg))
            }
        };

        // Slot write precedes the Release store; Acquire readers of
        // `done` are guaranteed to see it.
        *self.outcome.lock() = Some(outcome);
        self.done.store(true, Ordering::Release);

        let waiters = std::mem::take(&mut *self.waiters.lock());
        for waiter in waiters {
            waiter.resume();
        }
    }

    /// Replay the stored outcome. Requires `done == true`.
    fn replay(&self) -> TaskResult<T>
    where
        T: Clone,
    {
        self.outcome
            .lock()
            .as_ref()
            .expect("completion flag set before outcome write")
            .clone()
    }
}

impl<T: Send> Offloadable for TaskInner<T> {
    fn run(&self) {
        self.execute();
    }

    fn is_finished(&self) -> bool {
        self.is_done()
    }
}

/// Submitter-side handle to an offloaded task.
///
/// Cloneable; all clones observe the same completion and outcome. If a
/// failed task is never waited on, its error is silently discarded when
/// the last holder drops - an accepted policy, visible under
/// `OFL_LOG_LEVEL=debug`.
pub struct TaskHandle<T> {
    inner: Arc<TaskInner<T>>,
}

impl<T> Clone for TaskHandle<T> {
    fn clone(&self) -> Self {
        TaskHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Wrap a closure into a task, returning the submitter handle and the
    /// type-erased unit the pool queues.
    pub fn new<F>(func: F) -> (TaskHandle<T>, Arc<dyn Offloadable>)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let inner = Arc::new(TaskInner::new(Box::new(func)));
        let handle = TaskHandle {
            inner: Arc::clone(&inner),
        };
        (handle, inner)
    }

    /// Non-blocking completion check.
    ///
    /// Monotone: once true, never false again.
    #[inline]
    pub fn poll(&self) -> bool {
        self.inner.is_done()
    }

    /// Wait for the task, suspending the current execution context
    /// through `bridge` if it has not completed yet.
    ///
    /// Already-completed tasks return immediately with no suspension.
    /// Idempotent: every call replays the same value or the same error,
    /// which is why `T: Clone` is required here and nowhere else.
    pub fn wait<B: SuspendBridge>(&self, bridge: &B) -> TaskResult<T>
    where
        T: Clone,
    {
        if !self.inner.is_done() {
            let handle = bridge.wait_handle();
            self.inner.add_waiter(handle.clone());
            // Re-check after registering: if completion raced past us the
            // flag is already set; otherwise the resume is pending and
            // permit semantics make the suspend return.
            while !self.inner.is_done() {
                bridge.suspend(&handle);
            }
        }
        self.inner.replay()
    }
}

/// Best-effort extraction of a panic payload as text.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    /// Bridge for plain test threads: suspend = park this OS thread.
    /// `std::thread` park/unpark already has the required permit
    /// semantics.
    struct ParkBridge;

    struct ParkedThread {
        thread: thread::Thread,
    }

    impl WaitHandle for ParkedThread {
        fn resume(&self) {
            self.thread.unpark();
        }
    }

    impl SuspendBridge for ParkBridge {
        type Handle = ParkedThread;

        fn wait_handle(&self) -> Arc<ParkedThread> {
            Arc::new(ParkedThread {
                thread: thread::current(),
            })
        }

        fn suspend(&self, _handle: &ParkedThread) {
            thread::park();
        }
    }

    #[test]
    fn test_value_delivery() {
        let (handle, task) = TaskHandle::new(|| 2 + 2);
        assert!(!handle.poll());

        task.run();

        assert!(handle.poll());
        assert_eq!(handle.wait(&ParkBridge), Ok(4));
    }

    #[test]
    fn test_poll_is_monotone() {
        let (handle, task) = TaskHandle::new(|| ());
        assert!(!handle.poll());
        assert!(!task.is_finished());

        task.run();

        for _ in 0..100 {
            assert!(handle.poll());
        }
    }

    #[test]
    fn test_panic_is_contained_and_replayed() {
        let (handle, task) = TaskHandle::new(|| -> u32 { panic!("BOOM") });

        // run() must not unwind into the worker loop
        task.run();

        let first = handle.wait(&ParkBridge);
        let second = handle.wait(&ParkBridge);
        assert_eq!(first, Err(TaskError::Failed("BOOM".to_string())));
        assert_eq!(first, second);
    }

    #[test]
    fn test_string_panic_payload() {
        let (handle, task) = TaskHandle::new(|| -> u32 { panic!("code {}", 7) });
        task.run();
        assert_eq!(
            handle.wait(&ParkBridge),
            Err(TaskError::Failed("code 7".to_string()))
        );
    }

    #[test]
    fn test_double_run_is_noop() {
        let (handle, task) = TaskHandle::new(|| 33);
        task.run();
        task.run();
        assert_eq!(handle.wait(&ParkBridge), Ok(33));
    }

    #[test]
    fn test_wait_suspends_until_completion() {
        let (handle, task) = TaskHandle::new(|| 33);

        let waiter = thread::spawn(move || handle.wait(&ParkBridge));

        // Give the waiter time to register and park
        thread::sleep(Duration::from_millis(50));
        task.run();

        assert_eq!(waiter.join().unwrap(), Ok(33));
    }

    #[test]
    fn test_wait_idempotent_across_clones() {
        let (handle, task) = TaskHandle::new(|| String::from("ok"));
        let clone = handle.clone();
        task.run();

        assert_eq!(handle.wait(&ParkBridge), Ok("ok".to_string()));
        assert_eq!(clone.wait(&ParkBridge), Ok("ok".to_string()));
        assert_eq!(handle.wait(&ParkBridge), Ok("ok".to_string()));
    }
}
