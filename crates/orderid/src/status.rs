use crate::OrderedId;

/// Represents the result of a single attempt to generate an identifier.
///
/// - [`IdGenStatus::Ready`] indicates a new ID was generated.
/// - [`IdGenStatus::Pending`] means the sequence of the current millisecond is
///   exhausted and no ID can be issued until the clock reaches `yield_until`.
///
/// This allows non-blocking generation loops and custom backoff strategies.
///
/// # Example
///
/// ```
/// use orderid::{IdGenStatus, NodeRegistry, TimeSource, ThreadSleep};
/// use std::sync::Arc;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_646_623_882_475
///     }
/// }
///
/// let registry = Arc::new(NodeRegistry::new());
/// let generator = registry.claim_with(3, FixedTime, ThreadSleep).unwrap();
/// match generator.try_create() {
///     IdGenStatus::Ready { id } => assert_eq!(id.node_id(), 3),
///     IdGenStatus::Pending { yield_until } => println!("back off until {yield_until}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: OrderedId,
    },
    /// No ID could be generated because the sequence has been exhausted for
    /// the current millisecond.
    Pending {
        /// The first millisecond (inclusive, since the Unix epoch) at which
        /// generation may resume.
        yield_until: u64,
    },
}
