//! Field helpers that serialize an [`OrderedId`] as base-N text.
//!
//! A bare `OrderedId` serializes as its native `u64`. Use one of these
//! modules with `#[serde(with = "...")]` to store the compact text form
//! instead:
//!
//! ```
//! use orderid::OrderedId;
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct Message {
//!     #[serde(with = "orderid::as_base58")]
//!     id: OrderedId,
//! }
//! ```

use crate::{Alphabet, EncodeBuf, OrderedId};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

fn serialize_with<S>(alphabet: &Alphabet, id: &OrderedId, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut buf = EncodeBuf::default();
    s.serialize_str(alphabet.encode_to_buf(id.to_raw(), &mut buf))
}

fn deserialize_with<'de, D>(alphabet: &Alphabet, d: D) -> Result<OrderedId, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(d)?;
    alphabet
        .decode(&text)
        .map(OrderedId::from_raw)
        .map_err(D::Error::custom)
}

pub mod as_base32 {
    use super::{Deserializer, OrderedId, Serializer, deserialize_with, serialize_with};
    use crate::BASE32;

    /// Serialize an ID as base-32 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(id: &OrderedId, s: S) -> Result<S::Ok, S::Error> {
        serialize_with(&BASE32, id, s)
    }

    /// Deserialize an ID from base-32 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a string or is not valid base-32.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OrderedId, D::Error> {
        deserialize_with(&BASE32, d)
    }
}

pub mod as_base58 {
    use super::{Deserializer, OrderedId, Serializer, deserialize_with, serialize_with};
    use crate::BASE58;

    /// Serialize an ID as base-58 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(id: &OrderedId, s: S) -> Result<S::Ok, S::Error> {
        serialize_with(&BASE58, id, s)
    }

    /// Deserialize an ID from base-58 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a string or is not valid base-58.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OrderedId, D::Error> {
        deserialize_with(&BASE58, d)
    }
}

pub mod as_base64 {
    use super::{Deserializer, OrderedId, Serializer, deserialize_with, serialize_with};
    use crate::BASE64;

    /// Serialize an ID as base-64 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(id: &OrderedId, s: S) -> Result<S::Ok, S::Error> {
        serialize_with(&BASE64, id, s)
    }

    /// Deserialize an ID from base-64 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a string or is not valid base-64.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OrderedId, D::Error> {
        deserialize_with(&BASE64, d)
    }
}

#[cfg(test)]
mod tests {
    use crate::OrderedId;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Envelope {
        native: OrderedId,
        #[serde(with = "crate::as_base32")]
        b32: OrderedId,
        #[serde(with = "crate::as_base58")]
        b58: OrderedId,
        #[serde(with = "crate::as_base64")]
        b64: OrderedId,
    }

    #[test]
    fn renders_each_field_in_its_encoding() {
        let id = OrderedId::from_raw(570_178_876_211_201);
        let envelope = Envelope {
            native: id,
            b32: id,
            b58: id,
            b64: id,
        };

        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(
            json,
            r#"{"native":570178876211201,"b32":"ng1cysxxxo","b58":"5seCENFRt","b64":"CBpMdYAAB"}"#
        );

        let decoded: Envelope = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn rejects_text_outside_alphabet() {
        let json = r#"{"native":1,"b32":"x","b58":"0","b64":"A"}"#;
        let err = serde_json::from_str::<Envelope>(json).unwrap_err();
        assert!(err.to_string().contains("invalid base58 encoding"), "{err}");
    }
}
