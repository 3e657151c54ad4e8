//! Stress test - many tasks over a small pool
//!
//! Submits a batch of CPU-trivial tasks and awaits every handle from
//! plain OS threads via the blocking bridge, then reports throughput.

use offload::{BlockingBridge, OffloadPool, PoolConfig};
use std::time::Instant;

fn main() {
    println!("=== Offload Stress Test ===\n");

    let num_tasks: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(10_000);
    let num_workers: usize = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(4);

    println!("Submitting {} tasks to {} workers...", num_tasks, num_workers);

    let config = PoolConfig::default().thread_count(num_workers);
    let pool = OffloadPool::start(config).expect("pool construction");

    let start = Instant::now();
    let handles: Vec<_> = (0..num_tasks as u64)
        .map(|i| pool.submit(move || i * i))
        .collect();
    let submit_time = start.elapsed();

    println!("Submit time: {:?}", submit_time);
    println!(
        "Submit rate: {:.0} tasks/sec",
        num_tasks as f64 / submit_time.as_secs_f64()
    );

    println!("\nAwaiting all handles...");
    let mut errors = 0usize;
    for (i, handle) in handles.iter().enumerate() {
        let i = i as u64;
        match handle.wait(&BlockingBridge) {
            Ok(v) if v == i * i => {}
            _ => errors += 1,
        }
    }
    let total_time = start.elapsed();

    pool.shutdown();

    println!("\n=== Results ===");
    println!("Tasks:      {}", num_tasks);
    println!("Workers:    {}", num_workers);
    println!("Errors:     {}", errors);
    println!("Total time: {:?}", total_time);
    println!(
        "Throughput: {:.0} tasks/sec",
        num_tasks as f64 / total_time.as_secs_f64()
    );
}
