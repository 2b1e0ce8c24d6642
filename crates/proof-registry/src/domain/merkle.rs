//! # Merkle Proof Verifier
//!
//! Recomputes a root from a leaf and its sibling path.
//!
//! ## Wire Format
//!
//! Interior nodes are `keccak256(min(a, b) || max(a, b))` where `min`/`max`
//! compare the 32-byte operands as unsigned big-endian strings. The input
//! to the hash is exactly 64 bytes with no prefix or length field. Sorting
//! makes a proof independent of whether each sibling sat on the left or
//! the right, so a proof is just the ordered list of sibling hashes from
//! the leaf level upward.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::entities::Hash;

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Leaf hash for a raw record. Producers may use any leaf encoding; this
/// is the plain Keccak-256 of the record bytes.
pub fn hash_leaf(data: &[u8]) -> Hash {
    keccak256(data)
}

/// Combine two nodes with the sorted-pair rule.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Keccak256::new();
    hasher.update(first);
    hasher.update(second);
    hasher.finalize().into()
}

/// Fold the proof into the leaf, returning the candidate root.
pub fn process_proof(leaf: &Hash, proof: &[Hash]) -> Hash {
    proof
        .iter()
        .fold(*leaf, |current, sibling| hash_pair(&current, sibling))
}

/// True iff `proof` leads from `leaf` to `root`.
///
/// An empty proof verifies only when the leaf is the root itself.
pub fn verify(proof: &[Hash], root: &Hash, leaf: &Hash) -> bool {
    process_proof(leaf, proof) == *root
}

/// A leaf together with the sibling path proving its inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Hash of the record being proven.
    pub leaf: Hash,
    /// Sibling hashes from the leaf level upward.
    pub siblings: Vec<Hash>,
}

impl MerkleProof {
    /// Create a proof.
    pub fn new(leaf: Hash, siblings: Vec<Hash>) -> Self {
        Self { leaf, siblings }
    }

    /// Root this proof commits to.
    pub fn compute_root(&self) -> Hash {
        process_proof(&self.leaf, &self.siblings)
    }

    /// Check the proof against a known root.
    pub fn verify(&self, root: &Hash) -> bool {
        verify(&self.siblings, root, &self.leaf)
    }

    /// Tree depth covered by the proof.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}
