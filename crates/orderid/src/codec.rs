//! Positional base-N renderings of a 64-bit identifier.
//!
//! Each [`Alphabet`] treats the identifier as an unsigned integer and writes
//! its digits most-significant first, without padding. Encoding never fails;
//! decoding is strict and rejects any byte outside the alphabet. The three
//! public alphabets are independent: text must be decoded with the alphabet
//! it was encoded with.

use crate::{Error, Result};

const NO_VALUE: u8 = 255;

/// Longest rendering of a `u64` in any supported alphabet (base 10).
pub const MAX_ENCODED_LEN: usize = 20;

/// Stack buffer large enough for any encoding produced by an [`Alphabet`].
pub type EncodeBuf = [u8; MAX_ENCODED_LEN];

/// Base-32 alphabet: `xotdrfg8ejkmcpybnq1uwisza345h769`.
pub static BASE32: Alphabet = Alphabet::new(b"xotdrfg8ejkmcpybnq1uwisza345h769");

/// Base-58 alphabet, omitting the look-alike characters `0`, `O`, `I`, `l`.
pub static BASE58: Alphabet =
    Alphabet::new(b"123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ");

/// Base-64 alphabet: `A-Z`, `a-z`, `0-9`, then `$` and `#`.
pub static BASE64: Alphabet =
    Alphabet::new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789$#");

/// Plain decimal digits. Backs the strict parser of [`OrderedId`]'s
/// `FromStr`.
///
/// [`OrderedId`]: crate::OrderedId
pub static DECIMAL: Alphabet = Alphabet::new(b"0123456789");

/// An ordered set of distinct ASCII symbols and its reverse lookup table.
///
/// The table is built at compile time; constructing an alphabet with
/// duplicate or non-ASCII symbols, or with fewer than 10 or more than 64
/// symbols, fails const evaluation.
#[derive(Debug)]
pub struct Alphabet {
    symbols: &'static [u8],
    lookup: [u8; 256],
}

impl Alphabet {
    /// Builds an alphabet whose digit values follow the order of `symbols`.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `static`) if `symbols` has
    /// fewer than 10 or more than 64 entries, contains a non-ASCII byte, or
    /// repeats a byte.
    #[must_use]
    pub const fn new(symbols: &'static [u8]) -> Self {
        assert!(
            symbols.len() >= 10 && symbols.len() <= 64,
            "alphabet must have between 10 and 64 symbols"
        );
        let mut lookup = [NO_VALUE; 256];
        let mut i = 0;
        while i < symbols.len() {
            let c = symbols[i];
            assert!(c.is_ascii(), "alphabet symbols must be ASCII");
            assert!(lookup[c as usize] == NO_VALUE, "alphabet symbols must be distinct");
            lookup[c as usize] = i as u8;
            i += 1;
        }
        Self { symbols, lookup }
    }

    /// The numeral base, i.e. the number of symbols.
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.symbols.len() as u32
    }

    /// The symbols in digit order.
    #[must_use]
    pub const fn symbols(&self) -> &'static [u8] {
        self.symbols
    }

    /// Encodes `id` into `buf` without allocating and returns the written
    /// suffix as a string slice.
    ///
    /// Zero encodes to the single symbol for digit 0.
    ///
    /// # Example
    ///
    /// ```
    /// use orderid::{BASE58, EncodeBuf};
    ///
    /// let mut buf = EncodeBuf::default();
    /// assert_eq!(BASE58.encode_to_buf(142_125_288_653_825, &mut buf), "27noD5f5R");
    /// ```
    pub fn encode_to_buf<'a>(&self, id: u64, buf: &'a mut EncodeBuf) -> &'a str {
        let base = u64::from(self.base());
        let mut rest = id;
        let mut pos = buf.len();
        loop {
            pos -= 1;
            buf[pos] = self.symbols[(rest % base) as usize];
            rest /= base;
            if rest == 0 {
                break;
            }
        }
        // SAFETY: `new` only admits ASCII symbols, so every written byte is a
        // complete UTF-8 code point.
        unsafe { core::str::from_utf8_unchecked(&buf[pos..]) }
    }

    /// Encodes `id` into a freshly allocated [`String`].
    ///
    /// See [`Alphabet::encode_to_buf`] for the allocation-free version.
    #[must_use]
    pub fn encode(&self, id: u64) -> String {
        let mut buf = EncodeBuf::default();
        self.encode_to_buf(id, &mut buf).to_owned()
    }

    /// Decodes text produced by [`Alphabet::encode`].
    ///
    /// Leading zero-digit symbols are accepted and do not change the value,
    /// and empty text decodes to `0`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEncoding`] if `text` contains any byte outside the
    ///   alphabet. No partial value is returned.
    /// - [`Error::ParseOverflow`] if every byte is valid but the value does
    ///   not fit in a `u64`.
    pub fn decode(&self, text: &str) -> Result<u64> {
        let base = u64::from(self.base());
        let mut acc = Some(0_u64);
        for b in text.bytes() {
            let digit = self.lookup[usize::from(b)];
            if digit == NO_VALUE {
                return Err(Error::InvalidEncoding { base: self.base() });
            }
            acc = acc
                .and_then(|acc| acc.checked_mul(base))
                .and_then(|acc| acc.checked_add(u64::from(digit)));
        }
        acc.ok_or(Error::ParseOverflow { base: self.base() })
    }
}

/// Encodes `id` with the [`BASE32`] alphabet.
#[must_use]
pub fn encode_base32(id: u64) -> String {
    BASE32.encode(id)
}

/// Decodes [`BASE32`] text.
///
/// # Errors
///
/// See [`Alphabet::decode`].
pub fn decode_base32(text: &str) -> Result<u64> {
    BASE32.decode(text)
}

/// Encodes `id` with the [`BASE58`] alphabet.
#[must_use]
pub fn encode_base58(id: u64) -> String {
    BASE58.encode(id)
}

/// Decodes [`BASE58`] text.
///
/// # Errors
///
/// See [`Alphabet::decode`].
pub fn decode_base58(text: &str) -> Result<u64> {
    BASE58.decode(text)
}

/// Encodes `id` with the [`BASE64`] alphabet.
#[must_use]
pub fn encode_base64(id: u64) -> String {
    BASE64.encode(id)
}

/// Decodes [`BASE64`] text.
///
/// # Errors
///
/// See [`Alphabet::decode`].
pub fn decode_base64(text: &str) -> Result<u64> {
    BASE64.decode(text)
}
