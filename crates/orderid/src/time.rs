use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// This abstraction allows you to plug in the system clock, a monotonic
/// ticker, or a mocked time source in tests.
///
/// # Example
///
/// ```
/// use orderid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_646_623_882_475
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_646_623_882_475);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

fn unix_millis() -> u64 {
    // A clock set before 1970 reads as zero.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

/// Reads `SystemTime::now()` on every call.
///
/// This is the default clock of [`NodeRegistry::claim`]. It follows wall-clock
/// adjustments, including backwards steps; use [`MonotonicClock`] when the
/// host clock is not trusted to move forward.
///
/// [`NodeRegistry::claim`]: crate::NodeRegistry::claim
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        unix_millis()
    }
}

/// Shared ticker state updated once per millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
}

/// A monotonic time source anchored to the wall clock at construction.
///
/// The clock captures `SystemTime::now()` once, then a background thread
/// advances a shared atomic counter by the elapsed `Instant` time every
/// millisecond. Reads are a single atomic load and never go backward, even
/// if the system clock is adjusted.
///
/// The ticker thread exits once the last clone of the clock is dropped.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    // in milliseconds since the Unix epoch
    origin: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a new ticker aligned to the current wall-clock time.
    ///
    /// # Example
    ///
    /// ```
    /// use orderid::{MonotonicClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let a = clock.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(2));
    /// assert!(clock.current_millis() >= a);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let start = Instant::now();
        let origin = unix_millis();

        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
        });

        let weak_inner = Arc::downgrade(&inner);
        thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = start.elapsed().as_millis() as u64;
                inner_ref.current.store(now_ms, Ordering::Relaxed);

                tick = now_ms + 1;
            }
        });

        Self { inner, origin }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.origin + self.inner.current.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EPOCH_MILLIS;

    #[test]
    fn system_clock_is_after_layout_epoch() {
        assert!(SystemClock.current_millis() > EPOCH_MILLIS);
    }

    #[test]
    fn monotonic_clock_never_goes_backward() {
        let clock = MonotonicClock::new();
        let mut last = clock.current_millis();
        for _ in 0..5 {
            thread::sleep(Duration::from_millis(1));
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn monotonic_clock_starts_near_wall_clock() {
        let clock = MonotonicClock::new();
        let wall = SystemClock.current_millis();
        assert!(clock.current_millis().abs_diff(wall) < 1_000);
    }

    #[test]
    fn shared_handles_forward_to_inner_clock() {
        fn read(time: impl TimeSource) -> u64 {
            time.current_millis()
        }

        let clock = Arc::new(MonotonicClock::new());
        let first = read(&*clock);
        let second = read(Arc::clone(&clock));
        assert!(second >= first);
    }
}
