//! Foundation types for C4 identifiers.
//!
//! A C4 id names content by its SHA-512 digest. Identical content always
//! yields the identical id, and the id is printed as a fixed 90-character
//! string: `c4` followed by 88 base-58 digits.
//!
//! # Key Types
//!
//! - [`Digest`] — 64-byte digest, ordered as an unsigned big-endian integer
//! - [`Identifier`] — textual id, with an explicit variant for the zero digest
//! - [`C4Error`] — parse and construction failures
//!
//! The [`codec`] module holds the fixed-width base-58 conversion, and
//! [`Digest::combine`] is the pairwise, order-independent rule for naming a
//! set of digests.

pub mod codec;
pub mod digest;
pub mod error;
pub mod identifier;

pub use codec::{ALPHABET, DIGEST_LEN, ID_LEN, PREFIX};
pub use digest::Digest;
pub use error::{C4Error, C4Result};
pub use identifier::{Encoded, Identifier, MAX_ID, NIL_ID, VOID_ID};
