use crate::{
    EPOCH_MILLIS, IdGenStatus, NodeRegistry, OrderedId, SEQUENCE_CAPACITY, SleepProvider,
    SystemClock, ThreadSleep, TimeSource,
};
use core::fmt;
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};

#[cfg(feature = "tracing")]
use tracing::instrument;


/// Per-millisecond bookkeeping, guarded by the generator lock.
#[derive(Debug, Default)]
struct TickState {
    /// Millisecond (since the Unix epoch) at which `sequence` was last reset.
    last_tick: u64,
    /// Next sequence number to hand out within `last_tick`.
    sequence: u64,
}

/// A lock-based generator bound to one claimed node id.
///
/// Instances are obtained from a [`NodeRegistry`], which guarantees that no
/// two live generators of that registry share a node id. The generator is
/// `Sync` whenever its clock and sleeper are, so it can be shared across
/// threads behind an [`Arc`]; each call holds the internal lock only for the
/// tick check and sequence increment.
///
/// Dropping the generator (or calling [`OrderedIdGenerator::release`])
/// returns its node id to the registry.
///
/// ## See Also
/// - [`NodeRegistry::claim`]
/// - [`NodeRegistry::claim_any`]
pub struct OrderedIdGenerator<T = SystemClock, S = ThreadSleep> {
    node_id: u64,
    generation: u64,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<TickState>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<TickState>,
    time: T,
    sleep: S,
    registry: Arc<NodeRegistry>,
}

impl<T, S> OrderedIdGenerator<T, S>
where
    T: TimeSource,
    S: SleepProvider,
{
    /// Binds a generator to a node id the caller has already reserved in
    /// `registry` at `generation`.
    pub(crate) fn new(
        node_id: u64,
        generation: u64,
        registry: Arc<NodeRegistry>,
        time: T,
        sleep: S,
    ) -> Self {
        let state = Mutex::new(TickState::default());
        Self {
            node_id,
            generation,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(state),
            #[cfg(not(feature = "cache-padded"))]
            state,
            time,
            sleep,
            registry,
        }
    }

    /// Generates the next ID, waiting for the next millisecond if the
    /// current one has no sequence numbers left.
    ///
    /// The wait happens outside the generator lock and lasts at most one
    /// millisecond per retry. After waking, the clock is read again; no state
    /// from before the wait is reused.
    ///
    /// # Example
    ///
    /// ```
    /// use orderid::NodeRegistry;
    /// use std::sync::Arc;
    ///
    /// let registry = Arc::new(NodeRegistry::new());
    /// let generator = registry.claim(7).unwrap();
    ///
    /// let a = generator.create();
    /// let b = generator.create();
    /// assert!(a < b);
    /// assert_eq!(b.node_id(), 7);
    /// ```
    pub fn create(&self) -> OrderedId {
        loop {
            match self.try_create() {
                IdGenStatus::Ready { id } => break id,
                IdGenStatus::Pending { yield_until } => {
                    let now = self.time.current_millis();
                    if yield_until > now {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(
                            node_id = self.node_id,
                            yield_until,
                            "sequence exhausted, waiting"
                        );
                        self.sleep.sleep_for(Duration::from_millis(yield_until - now));
                    }
                }
            }
        }
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// Returns [`IdGenStatus::Pending`] when the sequence space of the
    /// current millisecond is spent; the caller should retry once the clock
    /// reaches `yield_until`.
    ///
    /// A clock reading that differs from the previous one, in either
    /// direction, starts a fresh sequence. Readings before [`EPOCH_MILLIS`]
    /// produce a relative timestamp of zero.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(node_id = self.node_id))
    )]
    pub fn try_create(&self) -> IdGenStatus {
        let (now, count) = {
            let mut state = self.state.lock();
            // Read under the lock so callers see readings in lock order.
            let now = self.time.current_millis();
            if now != state.last_tick {
                state.last_tick = now;
                state.sequence = 0;
            } else if state.sequence >= SEQUENCE_CAPACITY {
                return Self::cold_exhausted(now);
            }
            let count = state.sequence;
            state.sequence += 1;
            (now, count)
        };

        let timestamp = now.saturating_sub(EPOCH_MILLIS);
        IdGenStatus::Ready {
            id: OrderedId::from_components(timestamp, count, self.node_id),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_exhausted(now: u64) -> IdGenStatus {
        IdGenStatus::Pending {
            yield_until: now + 1,
        }
    }
}

impl<T, S> OrderedIdGenerator<T, S> {
    /// The node id embedded in every ID this generator issues.
    #[must_use]
    pub const fn node_id(&self) -> u64 {
        self.node_id
    }

    /// The registry holding this generator's node id.
    #[must_use]
    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    /// Destroys the generator and frees its node id for reuse.
    pub fn release(self) {
        drop(self);
    }
}

impl<T, S> Drop for OrderedIdGenerator<T, S> {
    fn drop(&mut self) {
        self.registry.release_claim(self.node_id, self.generation);
    }
}

impl<T, S> fmt::Debug for OrderedIdGenerator<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedIdGenerator")
            .field("node_id", &self.node_id)
            .finish_non_exhaustive()
    }
}
