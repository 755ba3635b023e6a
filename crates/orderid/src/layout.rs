//! Bit layout of an ordered identifier.
//!
//! ```text
//!  Bit Index:  63             21 20            6 5           0
//!              +----------------+---------------+-------------+
//!  Field:      | timestamp (43) | sequence (15) | node id (6) |
//!              +----------------+---------------+-------------+
//!              |<------ MSB ------- 64 bits ------- LSB ----->|
//! ```
//!
//! The timestamp is stored relative to [`EPOCH_MILLIS`], which gives roughly
//! 278 years of range before the field rolls over. Placing it in the high bits
//! makes numeric order follow issuance time across nodes.
//!
//! Every function here is total: any `u64` unpacks to *some* triple. Feeding
//! back only values produced by a generator is the caller's responsibility.

/// Width of the node id field.
pub const NODE_ID_BITS: u32 = 6;

/// Width of the per-millisecond sequence field.
pub const SEQUENCE_BITS: u32 = 15;

/// Width of the relative timestamp field.
pub const TIMESTAMP_BITS: u32 = u64::BITS - SEQUENCE_BITS - NODE_ID_BITS;

/// Number of bits to shift the sequence field to its position (bit 6).
pub const SEQUENCE_SHIFT: u32 = NODE_ID_BITS;

/// Number of bits to shift the timestamp field to its position (bit 21).
pub const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + NODE_ID_BITS;

/// Bitmask for the 6-bit node id field.
pub const NODE_ID_MASK: u64 = (1 << NODE_ID_BITS) - 1;

/// Bitmask for the 15-bit sequence field.
pub const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// Bitmask for the 43-bit relative timestamp field.
pub const TIMESTAMP_MASK: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Number of distinct node ids, one bit each in the registry bitmap.
pub const MAX_NODES: u64 = 1 << NODE_ID_BITS;

/// Identifiers a single node can issue within one millisecond.
pub const SEQUENCE_CAPACITY: u64 = 1 << SEQUENCE_BITS;

/// Layout epoch: Friday, March 4, 2022 00:00:00 UTC, in milliseconds since
/// the Unix epoch.
pub const EPOCH_MILLIS: u64 = 1_646_352_000_000;

const _: () = assert!(TIMESTAMP_BITS + SEQUENCE_BITS + NODE_ID_BITS == u64::BITS);

/// Packs the three fields into a raw identifier.
///
/// `timestamp` is relative to [`EPOCH_MILLIS`]. Each field is masked to its
/// width, so out-of-range inputs never bleed into a neighbouring field.
#[must_use]
pub const fn pack(timestamp: u64, sequence: u64, node_id: u64) -> u64 {
    ((timestamp & TIMESTAMP_MASK) << TIMESTAMP_SHIFT)
        | ((sequence & SEQUENCE_MASK) << SEQUENCE_SHIFT)
        | (node_id & NODE_ID_MASK)
}

/// Milliseconds since the Unix epoch at which `id` was issued.
#[must_use]
pub const fn timestamp(id: u64) -> u64 {
    relative_timestamp(id) + EPOCH_MILLIS
}

/// Milliseconds since [`EPOCH_MILLIS`] at which `id` was issued.
#[must_use]
pub const fn relative_timestamp(id: u64) -> u64 {
    id >> TIMESTAMP_SHIFT
}

/// Sequence number of `id` within its millisecond.
#[must_use]
pub const fn sequence(id: u64) -> u64 {
    (id >> SEQUENCE_SHIFT) & SEQUENCE_MASK
}

/// Node that issued `id`.
#[must_use]
pub const fn node_id(id: u64) -> u64 {
    id & NODE_ID_MASK
}
