//! Streaming identification and digest trees for C4 identifiers.
//!
//! Provides the incremental SHA-512 [`StreamHasher`], helpers that identify
//! a whole reader in bounded chunks, and [`DigestTree`], which names a set of
//! digests by folding them pairwise in sorted order.

pub mod hasher;
pub mod tree;

pub use hasher::{encode, identify, identify_bytes, identify_digest, StreamHasher, CHUNK_SIZE};
pub use tree::{DigestTree, TreeProof};
