//! # orderid
//!
//! Time-ordered 64-bit identifiers for services that need sortable,
//! collision-free keys without a coordination service.
//!
//! An [`OrderedId`] packs a millisecond timestamp, a per-millisecond sequence
//! number and a node id (see [`layout`]). A [`NodeRegistry`] hands out each of
//! the 64 node ids to at most one live [`OrderedIdGenerator`], so IDs from
//! generators of one registry never collide, and IDs from one generator never
//! decrease.
//!
//! IDs render as decimal, as 8 big-endian bytes, or as compact base-32,
//! base-58 and base-64 text.
//!
//! ```
//! use orderid::{NodeRegistry, OrderedId};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(NodeRegistry::new());
//! let generator = registry.claim_any().unwrap();
//!
//! let id = generator.create();
//! let text = id.to_base58();
//! assert_eq!(OrderedId::from_base58(&text).unwrap(), id);
//! assert_eq!(id.node_id(), generator.node_id());
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): emit `tracing` events for node allocation and
//!   sequence exhaustion.
//! - `serde`: `Serialize`/`Deserialize` for [`OrderedId`] plus the
//!   `as_base32`, `as_base58` and `as_base64` field helpers.
//! - `cache-padded`: pad each generator's lock to a cache line.

mod codec;
mod error;
mod generator;
mod id;
pub mod layout;
mod registry;
#[cfg(feature = "serde")]
mod serde;
mod sleep;
mod status;
mod time;

pub use crate::codec::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::layout::{
    EPOCH_MILLIS, MAX_NODES, NODE_ID_BITS, NODE_ID_MASK, SEQUENCE_BITS, SEQUENCE_CAPACITY,
    TIMESTAMP_BITS,
};
pub use crate::registry::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::sleep::*;
pub use crate::status::*;
pub use crate::time::*;
