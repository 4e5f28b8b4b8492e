use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha512};

use crate::codec::{self, DIGEST_LEN};
use crate::error::{C4Error, C4Result};
use crate::identifier::Identifier;

/// A 64-byte SHA-512 digest naming a piece of content.
///
/// The bytes are an unsigned big-endian integer. Because the width is fixed,
/// the derived lexicographic ordering is the same as numeric ordering, which
/// is what [`combine`](Digest::combine) relies on to be order independent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// SHA-512 of the empty byte stream.
    pub const NIL: Self = Self([
        0xcf, 0x83, 0xe1, 0x35, 0x7e, 0xef, 0xb8, 0xbd, 0xf1, 0x54, 0x28, 0x50, 0xd6, 0x6d, 0x80,
        0x07, 0xd6, 0x20, 0xe4, 0x05, 0x0b, 0x57, 0x15, 0xdc, 0x83, 0xf4, 0xa9, 0x21, 0xd3, 0x6c,
        0xe9, 0xce, 0x47, 0xd0, 0xd1, 0x3c, 0x5d, 0x85, 0xf2, 0xb0, 0xff, 0x83, 0x18, 0xd2, 0x87,
        0x7e, 0xec, 0x2f, 0x63, 0xb9, 0x31, 0xbd, 0x47, 0x41, 0x7a, 0x81, 0xa5, 0x38, 0x32, 0x7a,
        0xf9, 0x27, 0xda, 0x3e,
    ]);

    /// Sixty-four zero bytes.
    pub const VOID: Self = Self([0u8; DIGEST_LEN]);

    /// Sixty-four `0xFF` bytes, the largest representable digest.
    pub const MAX: Self = Self([0xFF; DIGEST_LEN]);

    /// Hash a complete byte slice.
    pub fn hash(data: &[u8]) -> Self {
        Self::from_output(Sha512::digest(data).as_slice())
    }

    /// Wrap a full-width digest.
    pub const fn from_array(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a digest from at most 64 bytes, left-padding with zeros.
    pub fn from_slice(data: &[u8]) -> C4Result<Self> {
        if data.len() > DIGEST_LEN {
            return Err(C4Error::OversizedInput(data.len()));
        }
        let mut bytes = [0u8; DIGEST_LEN];
        bytes[DIGEST_LEN - data.len()..].copy_from_slice(data);
        Ok(Self(bytes))
    }

    /// Takes the output of a 512-bit hash function.
    pub(crate) fn from_output(output: &[u8]) -> Self {
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(output);
        Self(bytes)
    }

    /// Parse a 90-character C4 id.
    pub fn parse(src: &str) -> C4Result<Self> {
        codec::decode(src).map(Self)
    }

    /// The raw 64 bytes.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Returns `true` if every byte is zero.
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < DIGEST_LEN {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// The identifier naming this digest.
    pub const fn id(&self) -> Identifier {
        Identifier::from_digest(*self)
    }

    /// Same as [`id`](Digest::id).
    pub const fn to_identifier(&self) -> Identifier {
        self.id()
    }

    /// Combine two digests into the digest of their union.
    ///
    /// Equal inputs return the input unchanged. Otherwise the numerically
    /// smaller digest is hashed first, so `a.combine(&b) == b.combine(&a)`.
    /// Combining more than two digests is not associative; callers must fix
    /// the pairing order themselves.
    pub fn combine(&self, other: &Digest) -> Digest {
        if self == other {
            return *self;
        }
        let (low, high) = if self < other {
            (self, other)
        } else {
            (other, self)
        };

        let mut hasher = Sha512::new();
        hasher.update(low.0);
        hasher.update(high.0);
        Self::from_output(hasher.finalize().as_slice())
    }

    /// Hex-encoded bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl Default for Digest {
    fn default() -> Self {
        Self::VOID
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

/// Writes the C4 id. The zero digest writes nothing.
impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id(), f)
    }
}

impl FromStr for Digest {
    type Err = C4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_LEN] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = C4Error;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(data)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text.is_empty() {
            return Ok(Self::VOID);
        }
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
