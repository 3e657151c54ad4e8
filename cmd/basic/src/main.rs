//! Basic offload example
//!
//! A cooperative reactor runs two contexts: a periodic ticker, and a
//! context that offloads work onto the pool. The slow offloaded
//! operation suspends only its own context - the ticker keeps printing
//! while the worker thread sleeps.
//!
//! # Environment Variables
//!
//! - `OFL_FLUSH_EPRINT=1` - flush debug output immediately
//! - `OFL_LOG_LEVEL=debug` - set log level (off, error, warn, info, debug, trace)

use offload::{OffloadPool, PoolConfig, Reactor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// OFL_LOG_LEVEL=debug cargo run -p offload-basic
fn main() {
    println!("=== Offload Basic Example ===\n");

    let pool = OffloadPool::start(PoolConfig::default()).expect("pool construction");
    println!("Pool started with {} workers\n", pool.thread_count());

    let done = Arc::new(AtomicBool::new(false));
    let mut reactor = Reactor::new();

    // Ticker context: proves the reactor keeps scheduling while the
    // other context awaits
    reactor.spawn({
        let done = Arc::clone(&done);
        move |ctx| {
            let mut i = 0u32;
            while !done.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(200));
                println!("tick {} (context {})", i, ctx.id());
                i += 1;
                ctx.yield_now();
            }
        }
    });

    // Main context: offload a quick sum and a slow failing operation
    reactor.spawn({
        let done = Arc::clone(&done);
        let sum = pool.submit(|| 2 + 2);
        let slow = pool.submit(|| -> i32 {
            println!("Boom !");
            thread::sleep(Duration::from_secs(1));
            panic!("EXIT in run!");
        });
        move |ctx| {
            println!("2 + 2 = {:?}", sum.wait(ctx));

            match slow.wait(ctx) {
                Ok(value) => println!("slow op returned {}", value),
                Err(e) => println!("slow op failed: {}", e),
            }

            done.store(true, Ordering::SeqCst);
        }
    });

    reactor.run();
    pool.shutdown();

    println!("\n=== Example Complete ===");
}
