use serde::{Deserialize, Serialize};
use tracing::debug;

use c4_types::{C4Error, C4Result, Digest, Identifier, DIGEST_LEN};

/// Order-independent tree over a set of digests.
///
/// Leaves are sorted ascending and de-duplicated, then adjacent pairs are
/// folded with [`Digest::combine`] one level at a time. An odd node at the
/// end of a level is carried up unchanged. The root therefore names the set
/// of leaves regardless of the order or multiplicity they were supplied in.
///
/// This is an optional collaborator built on [`Digest::combine`]; it is not
/// part of the identifier contract, and file or stream ids never depend on it.
#[derive(Clone, Debug)]
pub struct DigestTree {
    /// Level 0 holds the sorted leaves, the last level holds only the root.
    levels: Vec<Vec<Digest>>,
}

impl DigestTree {
    /// Build a tree from any collection of digests.
    ///
    /// Fails with [`C4Error::InvalidTree`] if there are no digests.
    pub fn from_digests<I>(digests: I) -> C4Result<Self>
    where
        I: IntoIterator<Item = Digest>,
    {
        let mut leaves: Vec<Digest> = digests.into_iter().collect();
        leaves.sort_unstable();
        leaves.dedup();
        if leaves.is_empty() {
            return Err(C4Error::InvalidTree);
        }

        let mut levels = vec![leaves];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next: Vec<Digest> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => left.combine(right),
                    _ => pair[0],
                })
                .collect();
            levels.push(next);
        }

        debug!(
            leaves = levels[0].len(),
            levels = levels.len(),
            "built digest tree"
        );
        Ok(Self { levels })
    }

    /// Build a tree from concatenated 64-byte digests.
    pub fn from_packed(data: &[u8]) -> C4Result<Self> {
        if data.is_empty() || data.len() % DIGEST_LEN != 0 {
            return Err(C4Error::InvalidTree);
        }
        let digests = data
            .chunks_exact(DIGEST_LEN)
            .map(Digest::from_slice)
            .collect::<C4Result<Vec<_>>>()?;
        Self::from_digests(digests)
    }

    /// The sorted leaves, concatenated.
    pub fn to_packed(&self) -> Vec<u8> {
        self.leaves()
            .iter()
            .flat_map(|d| d.as_bytes().iter().copied())
            .collect()
    }

    /// The root digest.
    pub fn root(&self) -> Digest {
        match self.levels.last().and_then(|level| level.first()) {
            Some(root) => *root,
            None => Digest::VOID,
        }
    }

    /// The root identifier.
    pub fn id(&self) -> Identifier {
        self.root().id()
    }

    /// Sorted, unique leaves.
    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    /// Number of unique leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Number of levels including the leaves and the root.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Returns `true` if `digest` is one of the leaves.
    pub fn contains(&self, digest: &Digest) -> bool {
        self.leaves().binary_search(digest).is_ok()
    }

    /// Generate an inclusion proof for `leaf`.
    pub fn proof(&self, leaf: &Digest) -> Option<TreeProof> {
        let mut idx = self.leaves().binary_search(leaf).ok()?;
        let mut siblings = Vec::new();

        for level in &self.levels[..self.levels.len() - 1] {
            if let Some(sibling) = level.get(idx ^ 1) {
                siblings.push(*sibling);
            }
            idx /= 2;
        }

        Some(TreeProof {
            leaf: *leaf,
            siblings,
            root: self.root(),
        })
    }
}

/// Inclusion proof for a leaf of a [`DigestTree`].
///
/// Combination is commutative, so the path records only sibling digests,
/// not which side they were on. Levels where the node was carried up
/// contribute no sibling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeProof {
    /// The leaf being proven.
    pub leaf: Digest,
    /// Siblings from the leaf level upward.
    pub siblings: Vec<Digest>,
    /// Expected root.
    pub root: Digest,
}

impl TreeProof {
    /// Recompute the root from the leaf and siblings.
    pub fn verify(&self) -> bool {
        let computed = self
            .siblings
            .iter()
            .fold(self.leaf, |current, sibling| current.combine(sibling));
        computed == self.root
    }
}
