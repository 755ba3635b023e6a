use std::{sync::Arc, time::Duration};

/// Abstracts over how a blocked generator waits for the next millisecond.
///
/// [`OrderedIdGenerator::create`] calls this outside its lock whenever the
/// sequence space of the current millisecond is spent. The requested
/// duration is at most one millisecond.
///
/// [`OrderedIdGenerator::create`]: crate::OrderedIdGenerator::create
pub trait SleepProvider {
    fn sleep_for(&self, dur: Duration);
}

impl<S: SleepProvider + ?Sized> SleepProvider for &S {
    fn sleep_for(&self, dur: Duration) {
        (**self).sleep_for(dur);
    }
}

impl<S: SleepProvider + ?Sized> SleepProvider for Arc<S> {
    fn sleep_for(&self, dur: Duration) {
        (**self).sleep_for(dur);
    }
}

/// Parks the calling thread with [`std::thread::sleep`].
///
/// Lowest CPU usage, but may oversleep depending on the platform's scheduler
/// resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;

impl SleepProvider for ThreadSleep {
    fn sleep_for(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Yields to the OS scheduler instead of sleeping.
///
/// Retries sooner than [`ThreadSleep`] at the cost of tighter polling under
/// sustained exhaustion.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadYield;

impl SleepProvider for ThreadYield {
    fn sleep_for(&self, _dur: Duration) {
        std::thread::yield_now();
    }
}
