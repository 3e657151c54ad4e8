//! Single-permit park/unpark cell
//!
//! The sleep/wake primitive behind the blocking bridge and the reactor
//! harness. Semantics are a one-slot permit:
//!
//! - `unpark()` stores the permit and wakes a sleeper. A permit delivered
//!   while nobody is parked is NOT lost: the next `park()` consumes it and
//!   returns immediately. This is what makes resume-before-suspend safe
//!   for the suspension bridge.
//! - `park()` consumes a permit, sleeping until one arrives. May wake
//!   spuriously only in the sense that callers should re-check their
//!   condition; a return always means a permit was consumed or the wait
//!   was interrupted.
//!
//! Platform-specific implementations use the most efficient primitive
//! available: a raw futex word on Linux, a condvar elsewhere.

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod futex_linux;
        pub use futex_linux::FutexCell as ParkCell;
    } else {
        mod fallback;
        pub use fallback::CondvarCell as ParkCell;
    }
}

// The condvar fallback is compiled into Linux test builds too, so both
// implementations stay exercised by CI.
#[cfg(all(test, target_os = "linux"))]
mod fallback;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_permit_before_park() {
        let cell = ParkCell::new();
        cell.unpark();

        // Permit stored, so this park must not sleep
        let start = Instant::now();
        cell.park();
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_park_timeout_expires() {
        let cell = ParkCell::new();
        let start = Instant::now();
        let woken = cell.park_timeout(Duration::from_millis(50));
        let elapsed = start.elapsed();

        assert!(!woken);
        assert!(elapsed >= Duration::from_millis(40)); // allow some slack
    }

    #[test]
    fn test_cross_thread_wake() {
        let cell = Arc::new(ParkCell::new());
        let cell2 = Arc::clone(&cell);

        let handle = thread::spawn(move || {
            cell2.park_timeout(Duration::from_secs(10))
        });

        // Give the thread time to park
        thread::sleep(Duration::from_millis(50));
        cell.unpark();

        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_permit_is_consumed() {
        let cell = ParkCell::new();
        cell.unpark();
        cell.unpark(); // coalesced into the single slot

        cell.park();
        // Slot is empty again, so a timed park must expire
        assert!(!cell.park_timeout(Duration::from_millis(20)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_fallback_cell_cross_thread_wake() {
        let cell = Arc::new(super::fallback::CondvarCell::new());
        let cell2 = Arc::clone(&cell);

        let handle = thread::spawn(move || {
            cell2.park_timeout(Duration::from_secs(10))
        });

        thread::sleep(Duration::from_millis(50));
        cell.unpark();

        assert!(handle.join().unwrap());
    }
}
