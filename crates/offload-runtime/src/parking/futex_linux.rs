//! Linux futex-based park cell
//!
//! Futex word semantics:
//! - 0 = no permit
//! - 1 = permit stored
//!
//! `unpark` swaps the word to 1 and issues FUTEX_WAKE only on the 0 -> 1
//! transition. `park` swaps the word to 0; a 1 means the permit was
//! consumed, otherwise FUTEX_WAIT sleeps while the word is still 0.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Futex-backed single-permit cell
pub struct FutexCell {
    /// 0 = empty, 1 = permit stored
    futex: AtomicU32,
}

impl FutexCell {
    pub fn new() -> Self {
        Self {
            futex: AtomicU32::new(0),
        }
    }

    /// Consume a permit, sleeping until one arrives.
    pub fn park(&self) {
        loop {
            if self.futex.swap(0, Ordering::Acquire) == 1 {
                return;
            }
            // Sleep while the word is still 0. EINTR/EAGAIN fall through
            // to the re-check above.
            futex_wait(&self.futex, None);
        }
    }

    /// Consume a permit, sleeping at most `timeout`.
    ///
    /// Returns true iff a permit was consumed. An EINTR or spurious wake
    /// re-enters the wait with the remaining time, so the full timeout
    /// is honored.
    pub fn park_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.futex.swap(0, Ordering::Acquire) == 1 {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            futex_wait(&self.futex, Some(deadline - now));
        }
    }

    /// Store the permit and wake a sleeper.
    ///
    /// Never blocks; safe from any thread. Multiple unparks before the
    /// next park coalesce into the single permit slot.
    pub fn unpark(&self) {
        if self.futex.swap(1, Ordering::Release) == 0 {
            futex_wake(&self.futex);
        }
    }
}

impl Default for FutexCell {
    fn default() -> Self {
        Self::new()
    }
}

/// FUTEX_WAIT: sleep while the word equals 0.
fn futex_wait(word: &AtomicU32, timeout: Option<Duration>) {
    let timespec = timeout.map(|d| libc::timespec {
        tv_sec: d.as_secs() as libc::time_t,
        tv_nsec: d.subsec_nanos() as libc::c_long,
    });
    let timespec_ptr = match &timespec {
        Some(ts) => ts as *const libc::timespec,
        None => std::ptr::null(),
    };

    unsafe {
        libc::syscall(
            libc::SYS_futex,
            word.as_ptr(),
            libc::FUTEX_WAIT | libc::FUTEX_PRIVATE_FLAG,
            0u32, // expected value: sleep only while empty
            timespec_ptr,
            std::ptr::null::<u32>(),
            0u32,
        );
    }
}

/// FUTEX_WAKE: wake one sleeper on the word.
fn futex_wake(word: &AtomicU32) {
    unsafe {
        libc::syscall(
            libc::SYS_futex,
            word.as_ptr(),
            libc::FUTEX_WAKE | libc::FUTEX_PRIVATE_FLAG,
            1i32,
            std::ptr::null::<libc::timespec>(),
            std::ptr::null::<u32>(),
            0u32,
        );
    }
}
