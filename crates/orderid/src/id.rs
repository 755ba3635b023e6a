use crate::{BASE32, BASE58, BASE64, DECIMAL, Result, layout};
use core::{fmt, str::FromStr};

/// A 64-bit, time-ordered identifier issued by an [`OrderedIdGenerator`].
///
/// - 43 bits timestamp (ms since [`EPOCH_MILLIS`])
/// - 15 bits sequence
/// - 6 bits node id
///
/// The value is an opaque `u64`; the fields are read through fixed bit
/// offsets (see [`crate::layout`]). Ordering, equality and hashing are those
/// of the raw integer, so IDs sort by issuance time first.
///
/// # Example
///
/// ```
/// use orderid::OrderedId;
///
/// let id = OrderedId::from_components(271_882_475, 0, 1);
/// assert_eq!(id.timestamp(), 1_646_623_882_475);
/// assert_eq!(id.node_id(), 1);
/// assert_eq!(id.to_string(), "570178876211201");
/// assert_eq!(OrderedId::from_base58(&id.to_base58()).unwrap(), id);
/// ```
///
/// [`OrderedIdGenerator`]: crate::OrderedIdGenerator
/// [`EPOCH_MILLIS`]: crate::EPOCH_MILLIS
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderedId {
    id: u64,
}

impl OrderedId {
    /// Wraps a raw identifier without validation.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self { id }
    }

    /// Returns the raw `u64`.
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.id
    }

    /// Packs an identifier from its fields. `timestamp` is relative to the
    /// layout epoch; each field is masked to its width.
    #[must_use]
    pub const fn from_components(timestamp: u64, sequence: u64, node_id: u64) -> Self {
        Self::from_raw(layout::pack(timestamp, sequence, node_id))
    }

    /// Milliseconds since the Unix epoch at which this ID was issued.
    #[must_use]
    pub const fn timestamp(self) -> u64 {
        layout::timestamp(self.id)
    }

    /// Milliseconds since the layout epoch at which this ID was issued.
    #[must_use]
    pub const fn relative_timestamp(self) -> u64 {
        layout::relative_timestamp(self.id)
    }

    /// Sequence number of this ID within its millisecond.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        layout::sequence(self.id)
    }

    /// Node id of the generator that issued this ID.
    #[must_use]
    pub const fn node_id(self) -> u64 {
        layout::node_id(self.id)
    }

    /// Big-endian bytes. Byte-wise comparison of two encodings orders them
    /// the same way as the numeric values.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 8] {
        self.id.to_be_bytes()
    }

    /// Inverse of [`OrderedId::to_bytes`].
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self::from_raw(u64::from_be_bytes(bytes))
    }

    /// Returns the ID as a zero-padded 20-digit string, which sorts
    /// lexicographically in numeric order.
    #[must_use]
    pub fn to_padded_string(self) -> String {
        format!("{:020}", self.id)
    }

    #[must_use]
    pub fn to_base32(self) -> String {
        BASE32.encode(self.id)
    }

    #[must_use]
    pub fn to_base58(self) -> String {
        BASE58.encode(self.id)
    }

    #[must_use]
    pub fn to_base64(self) -> String {
        BASE64.encode(self.id)
    }

    /// Decodes [`BASE32`] text.
    ///
    /// # Errors
    ///
    /// See [`Alphabet::decode`](crate::Alphabet::decode).
    pub fn from_base32(text: &str) -> Result<Self> {
        BASE32.decode(text).map(Self::from_raw)
    }

    /// Decodes [`BASE58`] text.
    ///
    /// # Errors
    ///
    /// See [`Alphabet::decode`](crate::Alphabet::decode).
    pub fn from_base58(text: &str) -> Result<Self> {
        BASE58.decode(text).map(Self::from_raw)
    }

    /// Decodes [`BASE64`] text.
    ///
    /// # Errors
    ///
    /// See [`Alphabet::decode`](crate::Alphabet::decode).
    pub fn from_base64(text: &str) -> Result<Self> {
        BASE64.decode(text).map(Self::from_raw)
    }
}

impl From<u64> for OrderedId {
    fn from(id: u64) -> Self {
        Self::from_raw(id)
    }
}

impl From<OrderedId> for u64 {
    fn from(id: OrderedId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for OrderedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for OrderedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("sequence", &self.sequence())
            .field("node_id", &self.node_id())
            .finish()
    }
}

/// Parses plain decimal digits. Empty text, signs, whitespace and
/// separators are rejected.
impl FromStr for OrderedId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(crate::Error::InvalidEncoding { base: 10 });
        }
        DECIMAL.decode(s).map(Self::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EPOCH_MILLIS, Error};

    #[test]
    fn accessors_read_packed_fields() {
        let id = OrderedId::from_components(5, 7, 9);
        assert_eq!(id.relative_timestamp(), 5);
        assert_eq!(id.timestamp(), EPOCH_MILLIS + 5);
        assert_eq!(id.sequence(), 7);
        assert_eq!(id.node_id(), 9);
    }

    #[test]
    fn bytes_are_big_endian() {
        let id = OrderedId::from_raw(0x0102_0304_0506_0708);
        assert_eq!(id.to_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(OrderedId::from_bytes(id.to_bytes()), id);
    }

    #[test]
    fn byte_order_matches_numeric_order() {
        let a = OrderedId::from_components(100, 32_767, 63);
        let b = OrderedId::from_components(101, 0, 0);
        assert!(a < b);
        assert!(a.to_bytes() < b.to_bytes());
    }

    #[test]
    fn decimal_display_and_parse() {
        let id = OrderedId::from_raw(570_178_876_211_201);
        assert_eq!(id.to_string(), "570178876211201");
        assert_eq!("570178876211201".parse::<OrderedId>(), Ok(id));
        assert_eq!(OrderedId::from_raw(0).to_string(), "0");
        assert_eq!("18446744073709551615".parse::<OrderedId>(), Ok(OrderedId::from_raw(u64::MAX)));
    }

    #[test]
    fn decimal_parse_rejects_non_digits() {
        for text in ["", "+1", "-1", " 1", "12a", "1_000"] {
            assert_eq!(
                text.parse::<OrderedId>(),
                Err(Error::InvalidEncoding { base: 10 }),
                "{text:?}"
            );
        }
    }

    #[test]
    fn decimal_parse_rejects_overflow() {
        assert_eq!(
            "18446744073709551616".parse::<OrderedId>(),
            Err(Error::ParseOverflow { base: 10 })
        );
    }

    #[test]
    fn padded_string_has_twenty_digits() {
        assert_eq!(OrderedId::from_raw(42).to_padded_string(), "00000000000000000042");
    }

    #[test]
    fn text_forms_round_trip() {
        let id = OrderedId::from_raw(0x1234_5678_90AB_CDEF);
        assert_eq!(OrderedId::from_base32(&id.to_base32()), Ok(id));
        assert_eq!(OrderedId::from_base58(&id.to_base58()), Ok(id));
        assert_eq!(OrderedId::from_base64(&id.to_base64()), Ok(id));
    }

    #[test]
    fn debug_lists_fields() {
        let rendered = format!("{:?}", OrderedId::from_components(1, 2, 3));
        assert!(rendered.contains("sequence: 2"));
        assert!(rendered.contains("node_id: 3"));
    }
}
