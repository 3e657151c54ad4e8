//! Blocking suspension bridge
//!
//! For callers that are plain OS threads rather than contexts multiplexed
//! by a reactor. Outside a reactor, blocking the thread IS suspending the
//! context, so `suspend` simply parks the calling thread on the handle's
//! permit cell and `resume` unparks it from whichever worker completed
//! the task.

use crate::parking::ParkCell;
use offload_core::bridge::{SuspendBridge, WaitHandle};
use std::sync::Arc;

/// Bridge for plain OS-thread callers.
///
/// ```ignore
/// let pool = OffloadPool::start_default()?;
/// let handle = pool.submit(|| heavy_computation());
/// let value = handle.wait(&BlockingBridge)?;
/// ```
pub struct BlockingBridge;

/// Wait handle backed by a single-permit park cell.
pub struct BlockingWaitHandle {
    cell: ParkCell,
}

impl WaitHandle for BlockingWaitHandle {
    fn resume(&self) {
        self.cell.unpark();
    }
}

impl SuspendBridge for BlockingBridge {
    type Handle = BlockingWaitHandle;

    fn wait_handle(&self) -> Arc<BlockingWaitHandle> {
        Arc::new(BlockingWaitHandle {
            cell: ParkCell::new(),
        })
    }

    fn suspend(&self, handle: &BlockingWaitHandle) {
        handle.cell.park();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_resume_before_suspend_is_not_lost() {
        let bridge = BlockingBridge;
        let handle = bridge.wait_handle();

        // Resume first, from another thread
        let resumer = Arc::clone(&handle);
        thread::spawn(move || resumer.resume()).join().unwrap();

        // The permit is stored, so this returns immediately
        bridge.suspend(&handle);
    }

    #[test]
    fn test_cross_thread_resume() {
        let bridge = BlockingBridge;
        let handle = bridge.wait_handle();

        let resumer = Arc::clone(&handle);
        let t = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            resumer.resume();
        });

        bridge.suspend(&handle);
        t.join().unwrap();
    }
}
