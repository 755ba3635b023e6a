//! Error types for node allocation and identifier decoding.
//!
//! ID generation itself never fails: exhausting the sequence space of a
//! millisecond is backpressure, absorbed by the generator's rollover wait.
//! Every error in this module is reported once, to the caller that triggered
//! it, and leaves shared state untouched.

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `orderid` can emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested node id does not fit in the node field of the layout.
    #[error("invalid node id {node_id}: must be <= {max}")]
    InvalidNodeId {
        /// The rejected node id.
        node_id: u64,
        /// The largest node id the layout can carry.
        max: u64,
    },

    /// The requested node id is already held by a live generator.
    #[error("node id {node_id} is already in use")]
    NodeIdInUse {
        /// The contested node id.
        node_id: u64,
    },

    /// Every node id of the registry is claimed.
    #[error("all node ids are in use")]
    NodeIdsExhausted,

    /// The input contained a byte outside the alphabet of `base`, or was
    /// empty decimal text.
    #[error("invalid base{base} encoding")]
    InvalidEncoding {
        /// Numeral base of the alphabet the input was decoded with.
        base: u32,
    },

    /// The decoded value does not fit in 64 bits.
    #[error("base{base} value overflows 64 bits")]
    ParseOverflow {
        /// Numeral base of the alphabet the input was decoded with.
        base: u32,
    },
}
