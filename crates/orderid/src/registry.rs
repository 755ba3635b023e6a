//! Allocation of node ids to live generators.
//!
//! A [`NodeRegistry`] is a 64-bit bitmap, one bit per possible node id,
//! behind its own lock. Claiming sets a bit and hands out an
//! [`OrderedIdGenerator`] bound to it; dropping that generator clears the bit
//! again. Generators of one registry therefore never share a node id, which
//! together with the per-node sequence makes their IDs globally unique.
//!
//! State lives only as long as the registry: nothing is persisted, and
//! separate processes must be assigned disjoint node ids by other means.

use crate::{
    Error, MAX_NODES, NODE_ID_MASK, OrderedIdGenerator, Result, SleepProvider, SystemClock,
    ThreadSleep, TimeSource,
};
use parking_lot::Mutex;
use std::sync::{Arc, LazyLock};

/// Bitmap value with every node id claimed.
const ALL_CLAIMED: u64 = u64::MAX >> (u64::BITS as u64 - MAX_NODES);

/// The process-wide registry returned by [`NodeRegistry::global`].
static GLOBAL_REGISTRY: LazyLock<Arc<NodeRegistry>> =
    LazyLock::new(|| Arc::new(NodeRegistry::new()));

/// Tracks which node ids are currently claimed.
///
/// Registries are shared by [`Arc`]: every generator keeps a handle to the
/// registry it was claimed from so it can release its node id on drop. Claim
/// and release are serialized by a lock that no generator ever takes, so
/// allocating node ids never contends with ID generation.
///
/// # Example
///
/// ```
/// use orderid::{Error, NodeRegistry};
/// use std::sync::Arc;
///
/// let registry = Arc::new(NodeRegistry::new());
/// let generator = registry.claim(1).unwrap();
/// assert_eq!(generator.create().node_id(), 1);
///
/// assert!(matches!(registry.claim(1), Err(Error::NodeIdInUse { node_id: 1 })));
///
/// drop(generator);
/// assert!(registry.claim(1).is_ok());
/// ```
#[derive(Debug, Default)]
pub struct NodeRegistry {
    slots: Mutex<Slots>,
}

/// Claim bitmap plus a per-id generation that changes whenever a claim ends,
/// so a generator can tell whether it still owns its id.
#[derive(Debug)]
struct Slots {
    claimed: u64,
    generations: [u64; MAX_NODES as usize],
}

impl Default for Slots {
    fn default() -> Self {
        Self {
            claimed: 0,
            generations: [0; MAX_NODES as usize],
        }
    }
}

impl Slots {
    fn take(&mut self, node_id: u64) -> u64 {
        self.claimed |= 1 << node_id;
        self.generations[node_id as usize]
    }

    fn free(&mut self, node_id: u64) {
        self.claimed &= !(1 << node_id);
        let generation = &mut self.generations[node_id as usize];
        *generation = generation.wrapping_add(1);
        #[cfg(feature = "tracing")]
        tracing::debug!(node_id, "released node id");
    }
}

impl NodeRegistry {
    /// Creates an empty registry, independent of [`NodeRegistry::global`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the process-wide registry.
    ///
    /// The global registry starts empty on first use and lives until the
    /// process exits. Code that needs isolation (tests, several tenants in
    /// one process) should construct its own registry instead.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Claims `node_id` and returns a generator reading the system clock.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidNodeId`] if `node_id` does not fit in the node field.
    /// - [`Error::NodeIdInUse`] if a live generator already holds `node_id`.
    pub fn claim(self: &Arc<Self>, node_id: u64) -> Result<OrderedIdGenerator> {
        self.claim_with(node_id, SystemClock, ThreadSleep)
    }

    /// Claims the lowest free node id and returns a generator reading the
    /// system clock.
    ///
    /// # Errors
    ///
    /// - [`Error::NodeIdsExhausted`] if every node id is claimed.
    pub fn claim_any(self: &Arc<Self>) -> Result<OrderedIdGenerator> {
        self.claim_any_with(SystemClock, ThreadSleep)
    }

    /// Claims `node_id` for a generator using the given clock and sleeper.
    ///
    /// # Errors
    ///
    /// See [`NodeRegistry::claim`].
    pub fn claim_with<T, S>(
        self: &Arc<Self>,
        node_id: u64,
        time: T,
        sleep: S,
    ) -> Result<OrderedIdGenerator<T, S>>
    where
        T: TimeSource,
        S: SleepProvider,
    {
        let generation = self.reserve(node_id)?;
        Ok(OrderedIdGenerator::new(
            node_id,
            generation,
            Arc::clone(self),
            time,
            sleep,
        ))
    }

    /// Claims the lowest free node id for a generator using the given clock
    /// and sleeper.
    ///
    /// # Errors
    ///
    /// See [`NodeRegistry::claim_any`].
    pub fn claim_any_with<T, S>(
        self: &Arc<Self>,
        time: T,
        sleep: S,
    ) -> Result<OrderedIdGenerator<T, S>>
    where
        T: TimeSource,
        S: SleepProvider,
    {
        let (node_id, generation) = self.reserve_any()?;
        Ok(OrderedIdGenerator::new(
            node_id,
            generation,
            Arc::clone(self),
            time,
            sleep,
        ))
    }

    /// Frees `node_id`. Releasing a free or out-of-range id is a no-op.
    ///
    /// Generators release their own id on drop. Releasing an id whose
    /// generator is still alive ends that generator's claim: the id may be
    /// handed out again, and the old generator no longer frees it when
    /// dropped.
    pub fn release(&self, node_id: u64) {
        if node_id > NODE_ID_MASK {
            return;
        }
        let mut slots = self.slots.lock();
        if slots.claimed & (1 << node_id) != 0 {
            slots.free(node_id);
        }
    }

    /// Frees `node_id` only if the claim made at `generation` still holds.
    pub(crate) fn release_claim(&self, node_id: u64, generation: u64) {
        let mut slots = self.slots.lock();
        if slots.claimed & (1 << node_id) != 0 && slots.generations[node_id as usize] == generation
        {
            slots.free(node_id);
        }
    }

    /// Whether `node_id` is currently claimed.
    #[must_use]
    pub fn is_claimed(&self, node_id: u64) -> bool {
        node_id <= NODE_ID_MASK && self.slots.lock().claimed & (1 << node_id) != 0
    }

    /// Number of node ids currently claimed.
    #[must_use]
    pub fn claimed_count(&self) -> u32 {
        self.slots.lock().claimed.count_ones()
    }

    fn reserve(&self, node_id: u64) -> Result<u64> {
        if node_id > NODE_ID_MASK {
            return Err(Error::InvalidNodeId {
                node_id,
                max: NODE_ID_MASK,
            });
        }
        let mut slots = self.slots.lock();
        if slots.claimed & (1 << node_id) != 0 {
            return Err(Error::NodeIdInUse { node_id });
        }
        let generation = slots.take(node_id);
        #[cfg(feature = "tracing")]
        tracing::debug!(node_id, "claimed node id");
        Ok(generation)
    }

    fn reserve_any(&self) -> Result<(u64, u64)> {
        let mut slots = self.slots.lock();
        let free = !slots.claimed & ALL_CLAIMED;
        if free == 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(max_nodes = MAX_NODES, "all node ids are in use");
            return Err(Error::NodeIdsExhausted);
        }
        // Lowest free bit first.
        let node_id = u64::from(free.trailing_zeros());
        let generation = slots.take(node_id);
        #[cfg(feature = "tracing")]
        tracing::debug!(node_id, "claimed node id");
        Ok((node_id, generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, sync::Barrier, thread::scope};

    #[test]
    fn claim_binds_generator_to_node_id() {
        let registry = Arc::new(NodeRegistry::new());
        let generator = registry.claim(42).unwrap();
        assert_eq!(generator.node_id(), 42);
        assert_eq!(generator.create().node_id(), 42);
        assert!(registry.is_claimed(42));
        assert_eq!(registry.claimed_count(), 1);
    }

    #[test]
    fn claiming_same_id_twice_fails() {
        let registry = Arc::new(NodeRegistry::new());
        let _first = registry.claim(5).unwrap();
        assert_eq!(
            registry.claim(5).unwrap_err(),
            Error::NodeIdInUse { node_id: 5 }
        );
    }

    #[test]
    fn claim_rejects_out_of_range_id() {
        let registry = Arc::new(NodeRegistry::new());
        assert_eq!(
            registry.claim(64).unwrap_err(),
            Error::InvalidNodeId {
                node_id: 64,
                max: 63
            }
        );
        assert!(registry.claim(63).is_ok());
        assert_eq!(registry.claimed_count(), 0);
    }

    #[test]
    fn claim_any_takes_lowest_free_id() {
        let registry = Arc::new(NodeRegistry::new());
        let a = registry.claim_any().unwrap();
        let b = registry.claim_any().unwrap();
        let _c = registry.claim(3).unwrap();
        assert_eq!(a.node_id(), 0);
        assert_eq!(b.node_id(), 1);

        let d = registry.claim_any().unwrap();
        assert_eq!(d.node_id(), 2);
        let e = registry.claim_any().unwrap();
        assert_eq!(e.node_id(), 4);

        drop(b);
        assert_eq!(registry.claim_any().unwrap().node_id(), 1);
    }

    #[test]
    fn claim_any_fails_when_exhausted() {
        let registry = Arc::new(NodeRegistry::new());
        let generators: Vec<_> = (0..MAX_NODES)
            .map(|_| registry.claim_any().unwrap())
            .collect();
        assert_eq!(registry.claimed_count(), 64);
        assert_eq!(
            registry.claim_any().unwrap_err(),
            Error::NodeIdsExhausted
        );

        drop(generators);
        assert_eq!(registry.claimed_count(), 0);
    }

    #[test]
    fn release_is_idempotent() {
        let registry = Arc::new(NodeRegistry::new());
        registry.release(9);
        registry.release(9);
        registry.release(1_000);
        assert_eq!(registry.claimed_count(), 0);

        let generator = registry.claim(9).unwrap();
        generator.release();
        registry.release(9);
        assert!(!registry.is_claimed(9));
        assert!(registry.claim(9).is_ok());
    }

    #[test]
    fn dropping_generator_frees_its_id() {
        let registry = Arc::new(NodeRegistry::new());
        {
            let _generator = registry.claim(12).unwrap();
            assert!(registry.is_claimed(12));
        }
        assert!(!registry.is_claimed(12));
    }

    #[test]
    fn stale_generator_drop_keeps_newer_claim() {
        let registry = Arc::new(NodeRegistry::new());
        let stale = registry.claim(5).unwrap();
        registry.release(5);
        let current = registry.claim(5).unwrap();

        drop(stale);
        assert!(registry.is_claimed(5));
        assert!(matches!(
            registry.claim(5),
            Err(Error::NodeIdInUse { node_id: 5 })
        ));

        drop(current);
        assert!(!registry.is_claimed(5));
        assert!(registry.claim(5).is_ok());
    }

    #[test]
    fn registries_are_independent() {
        let a = Arc::new(NodeRegistry::new());
        let b = Arc::new(NodeRegistry::new());
        let _ga = a.claim(0).unwrap();
        let gb = b.claim(0).unwrap();
        assert!(Arc::ptr_eq(gb.registry(), &b));
        assert_eq!(a.claimed_count(), 1);
        assert_eq!(b.claimed_count(), 1);
    }

    #[test]
    fn global_registry_is_shared() {
        let a = NodeRegistry::global();
        let b = NodeRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));

        let generator = a.claim_any().unwrap();
        assert!(b.is_claimed(generator.node_id()));
    }

    #[test]
    fn concurrent_claims_hand_out_distinct_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 8;

        let registry = Arc::new(NodeRegistry::new());
        let ids = Mutex::new(HashSet::new());
        let all_claimed = Barrier::new(THREADS);

        scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    let held: Vec<_> = (0..PER_THREAD)
                        .map(|_| registry.claim_any().unwrap())
                        .collect();
                    for generator in &held {
                        assert!(ids.lock().insert(generator.node_id()));
                    }
                    // Hold every id until all threads have claimed theirs.
                    all_claimed.wait();
                    drop(held);
                });
            }
        });

        assert_eq!(ids.lock().len(), THREADS * PER_THREAD);
        assert_eq!(registry.claimed_count(), 0);
    }
}
