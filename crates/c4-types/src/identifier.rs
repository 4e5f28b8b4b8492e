//! The textual form of a digest.
//!
//! An [`Identifier`] is either [`Identifier::Zero`], the id of the all-zero
//! digest, or [`Identifier::Value`], a full-width `c4` id. Keeping the zero
//! case as its own variant means callers never have to guess whether an
//! empty string meant "zero" or "missing". On the wire the zero id is still
//! written as the empty string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{self, DIGITS_LEN, PREFIX};
use crate::digest::Digest;
use crate::error::{C4Error, C4Result};

/// The 88 base-58 digits of a non-zero id, kept alongside the digest they
/// encode so neither direction needs recomputing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Encoded {
    digits: [u8; DIGITS_LEN],
    digest: Digest,
}

impl Encoded {
    /// The digit symbols, without the `c4` prefix.
    pub fn digits(&self) -> &[u8; DIGITS_LEN] {
        &self.digits
    }

    /// The digest these digits encode.
    pub fn digest(&self) -> Digest {
        self.digest
    }
}

impl fmt::Display for Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Every digit comes from the ASCII alphabet.
        let digits = std::str::from_utf8(&self.digits).map_err(|_| fmt::Error)?;
        f.write_str(PREFIX)?;
        f.write_str(digits)
    }
}

impl fmt::Debug for Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encoded({self})")
    }
}

/// A C4 identifier.
///
/// `Zero` sorts before every `Value`, and values compare by their text, which
/// for fixed-width ids is the same as comparing the digests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// The id of the all-zero digest. Renders as the empty string.
    #[default]
    Zero,
    /// A 90-character `c4` id.
    Value(Encoded),
}

/// Id of the empty byte stream.
pub const NIL_ID: Identifier = Identifier::from_digest(Digest::NIL);

/// Id of the all-zero digest.
pub const VOID_ID: Identifier = Identifier::from_digest(Digest::VOID);

/// Id of the all-`0xFF` digest.
pub const MAX_ID: Identifier = Identifier::from_digest(Digest::MAX);

impl Identifier {
    /// Encode a digest.
    pub const fn from_digest(digest: Digest) -> Self {
        if digest.is_zero() {
            Self::Zero
        } else {
            Self::Value(Encoded {
                digits: codec::encode(digest.as_bytes()),
                digest,
            })
        }
    }

    /// Parse a 90-character C4 id. Text that decodes to zero yields `Zero`.
    pub fn parse(src: &str) -> C4Result<Self> {
        Digest::parse(src).map(Self::from_digest)
    }

    /// Decode back to the digest.
    pub fn digest(&self) -> Digest {
        match self {
            Self::Zero => Digest::VOID,
            Self::Value(encoded) => encoded.digest,
        }
    }

    /// Returns `true` for [`Identifier::Zero`].
    pub const fn is_zero(&self) -> bool {
        matches!(self, Self::Zero)
    }

    /// The encoded id, or [`C4Error::UnexpectedNil`] for the zero id.
    pub fn require_value(&self) -> C4Result<&Encoded> {
        match self {
            Self::Zero => Err(C4Error::UnexpectedNil),
            Self::Value(encoded) => Ok(encoded),
        }
    }
}

/// `Zero` writes nothing; a value writes all 90 characters.
impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => Ok(()),
            Self::Value(encoded) => fmt::Display::fmt(encoded, f),
        }
    }
}

impl FromStr for Identifier {
    type Err = C4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Digest> for Identifier {
    fn from(digest: Digest) -> Self {
        Self::from_digest(digest)
    }
}

impl From<Identifier> for Digest {
    fn from(id: Identifier) -> Self {
        id.digest()
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Digest::deserialize(deserializer).map(Self::from_digest)
    }
}
