//! # offload-reactor — cooperative contexts over the offload pool
//!
//! A minimal single-threaded cooperative reactor: many execution
//! contexts, exactly one running at a time, multiplexed by the reactor
//! loop. Used by the demos and tests as the host on the suspend side of
//! the bridge; any other reactor implementing [`SuspendBridge`] works the
//! same way.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Context (one at a time)                                 │
//! │    let h = pool.submit(work);   ← returns immediately    │
//! │    h.wait(ctx)                  ← suspends this context  │
//! └───────────────┬──────────────────────────────────────────┘
//!                 │ yield baton
//!                 ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  Reactor loop (scheduler thread, never blocks on tasks)  │
//! │    pop ready context → grant baton → wait for yield      │
//! └───────────────▲──────────────────────────────────────────┘
//!                 │ ready queue push + wake (any OS thread)
//! ┌───────────────┴──────────────────────────────────────────┐
//! │  Worker thread completing the task: handle.resume()      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Contexts are backed by OS threads, but the baton guarantees the
//! cooperative contract: a context runs only while it holds the grant,
//! and gives it back by suspending, yielding, or finishing. The reactor
//! thread itself never waits on a task result, so sibling contexts keep
//! progressing while one context awaits.
//!
//! A context that awaits a task abandoned by pool shutdown suspends
//! forever; that mirrors the pool's abandon contract.

use crossbeam_queue::SegQueue;
use offload_core::bridge::{SuspendBridge, WaitHandle};
use offload_core::kdebug;
use offload_runtime::parking::ParkCell;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// State shared by the reactor loop, its contexts, and resume handles.
struct ReactorShared {
    /// Ids of contexts ready to run. Resume handles push from any OS
    /// thread; only the reactor loop pops.
    ready: SegQueue<usize>,
    /// Wakes an idle reactor when a resume arrives.
    event: ParkCell,
    /// Unparked exactly once per grant, by the granted context, when it
    /// suspends, yields, or finishes.
    yielded: ParkCell,
}

struct ContextEntry {
    baton: Arc<ParkCell>,
    finished: Arc<AtomicBool>,
    join: Option<thread::JoinHandle<()>>,
}

/// The reactor: spawn contexts, then [`run`](Self::run) to completion.
pub struct Reactor {
    shared: Arc<ReactorShared>,
    contexts: Vec<ContextEntry>,
}

impl Reactor {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(ReactorShared {
                ready: SegQueue::new(),
                event: ParkCell::new(),
                yielded: ParkCell::new(),
            }),
            contexts: Vec::new(),
        }
    }

    /// Register a new execution context. Contexts start parked and run
    /// only once [`run`](Self::run) grants them the baton.
    ///
    /// Returns the context id.
    pub fn spawn<F>(&mut self, f: F) -> usize
    where
        F: FnOnce(&ReactorCtx) + Send + 'static,
    {
        let id = self.contexts.len();
        let baton = Arc::new(ParkCell::new());
        let finished = Arc::new(AtomicBool::new(false));

        let shared = Arc::clone(&self.shared);
        let ctx_baton = Arc::clone(&baton);
        let ctx_finished = Arc::clone(&finished);
        let join = thread::Builder::new()
            .name(format!("offload-ctx-{}", id))
            .spawn(move || {
                let ctx = ReactorCtx {
                    id,
                    shared,
                    baton: ctx_baton,
                };
                // Wait for the first grant
                ctx.baton.park();
                f(&ctx);
                ctx_finished.store(true, Ordering::Release);
                // Final yield back to the reactor loop
                ctx.shared.yielded.unpark();
            })
            .expect("failed to spawn context thread");

        self.shared.ready.push(id);
        self.contexts.push(ContextEntry {
            baton,
            finished,
            join: Some(join),
        });
        kdebug!("reactor: context {} spawned", id);
        id
    }

    /// Drive all contexts to completion, then join their threads.
    ///
    /// The loop grants the baton to one ready context at a time and
    /// parks until that context yields it back; while idle it parks on
    /// the event cell, woken by resumes from worker threads.
    pub fn run(&mut self) {
        let mut remaining = self.contexts.len();

        while remaining > 0 {
            match self.shared.ready.pop() {
                Some(id) => {
                    let entry = &self.contexts[id];
                    if entry.finished.load(Ordering::Acquire) {
                        // Stale resume for a context that already ended
                        continue;
                    }
                    entry.baton.unpark();
                    self.shared.yielded.park();
                    if entry.finished.load(Ordering::Acquire) {
                        remaining -= 1;
                    }
                }
                None => self.shared.event.park(),
            }
        }

        for entry in &mut self.contexts {
            if let Some(join) = entry.join.take() {
                let _ = join.join();
            }
        }
        kdebug!("reactor: all contexts finished");
    }
}

impl Default for Reactor {
    fn default() -> Self {
        Self::new()
    }
}

/// The current execution context, handed to every context closure.
///
/// Implements [`SuspendBridge`], so it is the `bridge` argument for
/// `TaskHandle::wait` inside a context.
pub struct ReactorCtx {
    id: usize,
    shared: Arc<ReactorShared>,
    baton: Arc<ParkCell>,
}

impl ReactorCtx {
    /// Id of this context within its reactor.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Re-ready this context and give the baton back, letting sibling
    /// contexts run before this one continues.
    pub fn yield_now(&self) {
        self.shared.ready.push(self.id);
        self.shared.yielded.unpark();
        self.baton.park();
    }
}

/// Resume half of a suspended context; shared with worker threads.
pub struct ReactorWaitHandle {
    id: usize,
    shared: Arc<ReactorShared>,
}

impl WaitHandle for ReactorWaitHandle {
    fn resume(&self) {
        self.shared.ready.push(self.id);
        self.shared.event.unpark();
    }
}

impl SuspendBridge for ReactorCtx {
    type Handle = ReactorWaitHandle;

    fn wait_handle(&self) -> Arc<ReactorWaitHandle> {
        Arc::new(ReactorWaitHandle {
            id: self.id,
            shared: Arc::clone(&self.shared),
        })
    }

    fn suspend(&self, _handle: &ReactorWaitHandle) {
        // Give the baton back, then wait to be granted again. A resume
        // that already arrived re-readied us, so the grant follows.
        self.shared.yielded.unpark();
        self.baton.park();
    }
}
