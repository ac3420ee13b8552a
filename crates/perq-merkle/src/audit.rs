//! Auditing inclusion proofs against a committed root.
//!
//! The verifier side of the tree: given a leaf hash, its proof, and the root
//! committed on-chain, recompute a candidate root with the same sorted-pair
//! rule the builder uses and compare. Because pairs are sorted before
//! hashing, the fold needs no left/right branching on the leaf index.

use crate::combine;

/// An inclusion proof for a single leaf of a [`Tree`](crate::Tree).
///
/// Holds the ordered sibling hashes from the leaf layer toward the root,
/// plus the zero-based index of the proven leaf in the original leaf
/// sequence (the claim contract pairs that index with the reward amount).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proof {
    audit_path: Vec<[u8; 32]>,
    leaf_index: usize,
}

impl Proof {
    /// Reassembles a proof from its parts, e.g. after deserializing a claim
    /// payload received over the wire.
    #[must_use]
    pub fn from_parts(audit_path: Vec<[u8; 32]>, leaf_index: usize) -> Self {
        Self {
            audit_path,
            leaf_index,
        }
    }

    /// Starts an audit of this proof.
    ///
    /// The audit can only be performed after providing the committed root
    /// and the claimed leaf hash:
    ///
    /// ```
    /// # use perq_merkle::Tree;
    /// let tree = Tree::from_leaves([&b"a"[..], b"b"]).expect("two leaves is a valid tree");
    /// let proof = tree.construct_proof(0).expect("leaf 0 is inside the tree");
    /// assert!(
    ///     proof
    ///         .audit()
    ///         .with_root(tree.root())
    ///         .with_leaf_hash(tree.leaf(0).unwrap())
    ///         .perform()
    /// );
    /// ```
    #[must_use]
    pub fn audit(&self) -> Audit<'_> {
        Audit {
            proof: self,
            root: NoRoot,
            leaf_hash: NoLeafHash,
        }
    }

    /// Recomputes the candidate root for `leaf_hash` under this proof.
    ///
    /// The result only matches the committed root if `leaf_hash` sat at
    /// [`Proof::leaf_index`] of the leaf sequence the root was built from.
    #[must_use]
    pub fn reconstruct_root(&self, leaf_hash: [u8; 32]) -> [u8; 32] {
        self.audit_path
            .iter()
            .fold(leaf_hash, |node, sibling| combine(&node, sibling))
    }

    /// Returns the ordered sibling hashes, leaf layer first.
    #[must_use]
    pub fn audit_path(&self) -> &[[u8; 32]] {
        &self.audit_path
    }

    /// Returns the zero-based index of the proven leaf in the original leaf
    /// sequence.
    #[must_use]
    pub fn leaf_index(&self) -> usize {
        self.leaf_index
    }

    /// Returns the number of sibling hashes in the proof.
    #[must_use]
    pub fn len(&self) -> usize {
        self.audit_path.len()
    }

    /// Returns `true` if the proof contains no sibling hashes, as for a
    /// single-leaf tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.audit_path.is_empty()
    }
}

pub struct NoRoot;
pub struct WithRoot([u8; 32]);
pub struct NoLeafHash;
pub struct WithLeafHash([u8; 32]);

/// An audit of a [`Proof`] under construction.
///
/// Created with [`Proof::audit`]; [`Audit::perform`] only becomes available
/// once both the root and the leaf hash are set.
pub struct Audit<'a, TRoot = NoRoot, TLeafHash = NoLeafHash> {
    proof: &'a Proof,
    root: TRoot,
    leaf_hash: TLeafHash,
}

impl<'a, TRoot, TLeafHash> Audit<'a, TRoot, TLeafHash> {
    /// Sets the committed root the proof is audited against.
    #[must_use]
    pub fn with_root(self, root: [u8; 32]) -> Audit<'a, WithRoot, TLeafHash> {
        Audit {
            proof: self.proof,
            root: WithRoot(root),
            leaf_hash: self.leaf_hash,
        }
    }

    /// Sets the leaf hash whose membership is claimed.
    #[must_use]
    pub fn with_leaf_hash(self, leaf_hash: [u8; 32]) -> Audit<'a, TRoot, WithLeafHash> {
        Audit {
            proof: self.proof,
            root: self.root,
            leaf_hash: WithLeafHash(leaf_hash),
        }
    }
}

impl Audit<'_, WithRoot, WithLeafHash> {
    /// Performs the audit, returning `true` iff the leaf hash recomputes the
    /// committed root under this proof.
    #[must_use]
    pub fn perform(self) -> bool {
        let WithRoot(root) = self.root;
        let WithLeafHash(leaf_hash) = self.leaf_hash;
        self.proof.reconstruct_root(leaf_hash) == root
    }
}
