//! A build-once Merkle tree with sorted-pair sha3-256 hashing.
//!
//! This tree commits a campaign's target-address set on-chain: the root is
//! written to the claim contract, and an inclusion proof lets a single wallet
//! address demonstrate membership in the committed set without revealing the
//! rest of it.
//!
//! The hashing convention is fixed by the on-chain verifier and must be
//! matched bit-for-bit:
//!
//! + leaves and parents are sha3-256 hashes (32 bytes);
//! + sibling nodes are sorted by their byte representation before being
//!   concatenated and hashed, so that pairing order never affects the parent
//!   hash (merkletreejs' `sortPairs: true`);
//! + a trailing unpaired node of an odd-length layer is carried into the
//!   next layer unchanged. It is neither duplicated nor hashed with itself.
//!
//! The tree retains every layer after construction and is immutable: it is
//! rebuilt on demand from a campaign's stored address list rather than
//! persisted or updated in place.
//!
//! # Usage and examples
//! ```
//! use perq_merkle::Tree;
//!
//! let tree = Tree::from_leaves([&[1u8; 32][..], &[2; 32], &[3; 32]])
//!     .expect("three leaves is a valid tree");
//!
//! let root = tree.root();
//! let proof = tree.construct_proof(1).expect("leaf 1 must be inside the tree");
//! let leaf_hash = tree.leaf(1).expect("leaf 1 must be inside the tree");
//!
//! assert!(
//!     proof
//!         .audit()
//!         .with_root(root)
//!         .with_leaf_hash(leaf_hash)
//!         .perform()
//! );
//! ```

use sha3::{
    Digest as _,
    Sha3_256,
};

pub mod audit;

pub use audit::{
    Audit,
    Proof,
};

/// Calculates `SHA3-256(leaf)`.
///
/// This is the only leaf derivation rule; the on-chain verifier hashes the
/// raw address bytes without a domain separation prefix.
#[must_use]
pub fn hash_leaf(leaf: &[u8]) -> [u8; 32] {
    Sha3_256::digest(leaf).into()
}

/// Calculates `SHA3-256(min(a, b) || max(a, b))`.
///
/// The two nodes are ordered by their byte representation before being
/// concatenated, so `combine(a, b) == combine(b, a)` for all inputs. This is
/// the sorted-pairs convention of the on-chain verifier; swapping the two
/// children of a pair must never change the derived parent.
#[must_use]
pub fn combine(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (left, right) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha3_256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// The error returned when attempting to construct a [`Tree`] from zero
/// leaves.
///
/// An empty leaf sequence has no meaningful root. Returning an error instead
/// of a sentinel value keeps a corrupt upstream target list from silently
/// committing garbage on-chain.
#[derive(Debug, thiserror::Error)]
#[error("cannot construct a merkle tree from an empty leaf sequence")]
pub struct EmptyTree;

/// A build-once merkle tree retaining all layers.
///
/// Layer 0 is the leaf-hash sequence exactly as provided (no reordering, no
/// deduplication); every following layer is derived with [`combine`] and the
/// carry-forward rule until a single-element root layer remains.
#[derive(Clone, Debug)]
pub struct Tree {
    layers: Vec<Vec<[u8; 32]>>,
}

impl Tree {
    /// Constructs a tree from an iterator of byte slices, hashing each item
    /// with [`hash_leaf`].
    ///
    /// # Errors
    /// Returns [`EmptyTree`] if the iterator yields no items.
    pub fn from_leaves<I, B>(iter: I) -> Result<Self, EmptyTree>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        Self::from_leaf_hashes(
            iter.into_iter()
                .map(|item| hash_leaf(item.as_ref()))
                .collect(),
        )
    }

    /// Constructs a tree from pre-hashed leaves.
    ///
    /// The leaf order is preserved verbatim as layer 0; a leaf's position in
    /// `leaves` is the index reported by [`Tree::find_leaf`] and carried in
    /// its proof.
    ///
    /// # Errors
    /// Returns [`EmptyTree`] if `leaves` is empty.
    pub fn from_leaf_hashes(leaves: Vec<[u8; 32]>) -> Result<Self, EmptyTree> {
        if leaves.is_empty() {
            return Err(EmptyTree);
        }
        let mut layers = vec![leaves];
        while layers[layers.len() - 1].len() > 1 {
            let next = next_layer(&layers[layers.len() - 1]);
            layers.push(next);
        }
        Ok(Self {
            layers,
        })
    }

    /// Returns the root hash of the tree.
    ///
    /// A single-leaf tree degenerates to that leaf being its own root.
    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        self.layers[self.layers.len() - 1][0]
    }

    /// Returns the number of leaves in the tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Returns the hash of the i-th leaf, or `None` if `i` falls outside the
    /// tree.
    #[must_use]
    pub fn leaf(&self, i: usize) -> Option<[u8; 32]> {
        self.layers[0].get(i).copied()
    }

    /// Returns the index of the first leaf equal to `leaf_hash`, or `None`
    /// if no leaf matches.
    ///
    /// Duplicate leaves resolve to the lowest index.
    #[must_use]
    pub fn find_leaf(&self, leaf_hash: &[u8; 32]) -> Option<usize> {
        self.layers[0].iter().position(|leaf| leaf == leaf_hash)
    }

    /// Constructs the inclusion proof for the i-th leaf of the tree.
    ///
    /// Returns `None` if `leaf_index` is outside the tree.
    ///
    /// A leaf that is the carried trailing element of some odd-length layer
    /// has no sibling at that layer, so its audit path is shorter than that
    /// of a fully paired leaf.
    ///
    /// # Examples
    /// ```
    /// # use perq_merkle::Tree;
    /// let tree = Tree::from_leaves([b"a"]).expect("one leaf is a valid tree");
    /// let proof = tree.construct_proof(0).expect("leaf 0 is inside the tree");
    /// assert!(proof.is_empty());
    /// assert!(tree.construct_proof(1).is_none());
    /// ```
    #[must_use]
    pub fn construct_proof(&self, leaf_index: usize) -> Option<Proof> {
        if leaf_index >= self.leaf_count() {
            return None;
        }
        let mut audit_path = Vec::new();
        let mut index = leaf_index;
        for layer in &self.layers[..self.layers.len() - 1] {
            if index % 2 == 0 {
                // the carried trailing element has no sibling at this layer
                if let Some(sibling) = layer.get(index + 1) {
                    audit_path.push(*sibling);
                }
            } else {
                audit_path.push(layer[index - 1]);
            }
            index /= 2;
        }
        Some(Proof::from_parts(audit_path, leaf_index))
    }
}

/// Derives the parent layer of `layer`.
///
/// Complete pairs are combined left to right; an odd trailing element is
/// carried forward unchanged.
fn next_layer(layer: &[[u8; 32]]) -> Vec<[u8; 32]> {
    let mut next = Vec::with_capacity(layer.len().div_ceil(2));
    let mut pairs = layer.chunks_exact(2);
    for pair in &mut pairs {
        next.push(combine(&pair[0], &pair[1]));
    }
    if let [carry] = pairs.remainder() {
        next.push(*carry);
    }
    next
}
