use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Suspends the calling cycle between path steps.
pub trait Sleeper: Send {
    fn sleep(&self, dur: Duration);
}

/// Blocks the current thread.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, dur: Duration) {
        thread::sleep(dur);
    }
}

/// Returns immediately. Used for replays and tests.
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _dur: Duration) {}
}

/// Cooperative stop flag, consulted at path step boundaries only.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
