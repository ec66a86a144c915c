//! Merkle proof verification for stake snapshots
//!
//! Trees use domain-separated SHA256 hashing:
//! - leaf node: `sha256(0x00 || sha256(leaf fields))`
//! - intermediate node: `sha256(0x01 || min(a, b) || max(a, b))`
//!
//! Sorted pairs make proofs position-free, so a proof is only a list of
//! sibling hashes from the leaf up to the root.

use anchor_lang::prelude::*;
use solana_program::hash::hashv;

use crate::errors::GovernanceError;
use crate::instructions::constants::MAX_PROOF_DEPTH;

pub const HASH_SIZE: usize = 32;

const LEAF_PREFIX: &[u8] = &[0];
const INTERMEDIATE_PREFIX: &[u8] = &[1];

/// Hash serialized leaf fields into a leaf node
pub fn hash_leaf_fields(fields: &[&[u8]]) -> [u8; 32] {
    let inner = hashv(fields).to_bytes();
    hashv(&[LEAF_PREFIX, &inner]).to_bytes()
}

/// Hash two child nodes into their parent
pub fn hash_intermediate(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    if a <= b {
        hashv(&[INTERMEDIATE_PREFIX, a, b]).to_bytes()
    } else {
        hashv(&[INTERMEDIATE_PREFIX, b, a]).to_bytes()
    }
}

/// Compare two hashes without an early exit on the first differing byte
fn hashes_equal(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn compute_root(proof: &[[u8; 32]], leaf: [u8; 32]) -> [u8; 32] {
    proof
        .iter()
        .fold(leaf, |node, sibling| hash_intermediate(&node, sibling))
}

/// Verify that `leaf` is included under `root`
pub fn verify(proof: &[[u8; 32]], root: [u8; 32], leaf: [u8; 32]) -> bool {
    if proof.len() > MAX_PROOF_DEPTH {
        return false;
    }
    hashes_equal(&compute_root(proof, leaf), &root)
}

/// Verify inclusion and additionally require a proof of exactly `depth` siblings
pub fn verify_with_depth(
    proof: &[[u8; 32]],
    root: [u8; 32],
    leaf: [u8; 32],
    depth: usize,
) -> bool {
    proof.len() == depth && verify(proof, root, leaf)
}

/// Verify inclusion, mapping each failure to its program error
pub fn require_valid_proof(proof: &[[u8; 32]], root: [u8; 32], leaf: [u8; 32]) -> Result<()> {
    require!(root != [0u8; 32], GovernanceError::MerkleRootNotSet);
    require!(
        proof.len() <= MAX_PROOF_DEPTH,
        GovernanceError::InvalidMerkleInputs
    );
    require!(
        verify(proof, root, leaf),
        GovernanceError::InvalidMerkleProof
    );
    Ok(())
}

/// Off-chain tree builder producing roots and proofs with the same hashing.
///
/// Odd levels are padded by duplicating the last node, so every leaf has a
/// proof of the same length.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build a tree over leaf nodes (already hashed with `hash_leaf_fields`)
    pub fn new(leaves: &[[u8; 32]]) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }

        let mut levels = vec![leaves.to_vec()];
        while let Some(level) = levels.last() {
            if level.len() == 1 {
                break;
            }
            let mut padded = level.clone();
            if padded.len() % 2 == 1 {
                let last = padded[padded.len() - 1];
                padded.push(last);
            }
            let parents = padded
                .chunks(2)
                .map(|pair| hash_intermediate(&pair[0], &pair[1]))
                .collect();
            levels.push(parents);
        }

        Some(Self { levels })
    }

    pub fn root(&self) -> [u8; 32] {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_default()
    }

    /// Number of siblings in every proof
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    pub fn proof(&self, index: usize) -> Option<Vec<[u8; 32]>> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut proof = Vec::with_capacity(self.depth());
        let mut position = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = position ^ 1;
            // Missing right sibling is the duplicated last node
            let node = level.get(sibling).unwrap_or(&level[position]);
            proof.push(*node);
            position /= 2;
        }
        Some(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(count: u8) -> Vec<[u8; 32]> {
        (0..count)
            .map(|i| hash_leaf_fields(&[&[i][..], &b"stake"[..]]))
            .collect()
    }

    #[test]
    fn test_honest_proofs_verify_for_every_leaf() {
        for count in 1..=9u8 {
            let nodes = leaves(count);
            let tree = MerkleTree::new(&nodes).unwrap();
            for (index, leaf) in nodes.iter().enumerate() {
                let proof = tree.proof(index).unwrap();
                assert_eq!(proof.len(), tree.depth());
                assert!(verify(&proof, tree.root(), *leaf), "count {count} index {index}");
                assert!(verify_with_depth(&proof, tree.root(), *leaf, tree.depth()));
            }
        }
    }

    #[test]
    fn test_single_leaf_tree_root_is_leaf() {
        let nodes = leaves(1);
        let tree = MerkleTree::new(&nodes).unwrap();
        assert_eq!(tree.root(), nodes[0]);
        assert_eq!(tree.depth(), 0);
        assert!(verify(&[], tree.root(), nodes[0]));
    }

    #[test]
    fn test_empty_tree_is_rejected() {
        assert!(MerkleTree::new(&[]).is_none());
    }

    #[test]
    fn test_proof_out_of_range() {
        let tree = MerkleTree::new(&leaves(3)).unwrap();
        assert!(tree.proof(3).is_none());
    }

    #[test]
    fn test_bit_flip_in_leaf_rejected() {
        let nodes = leaves(5);
        let tree = MerkleTree::new(&nodes).unwrap();
        let proof = tree.proof(2).unwrap();
        let mut leaf = nodes[2];
        leaf[0] ^= 0x01;
        assert!(!verify(&proof, tree.root(), leaf));
    }

    #[test]
    fn test_bit_flip_in_proof_rejected() {
        let nodes = leaves(5);
        let tree = MerkleTree::new(&nodes).unwrap();
        let mut proof = tree.proof(4).unwrap();
        proof[1][17] ^= 0x80;
        assert!(!verify(&proof, tree.root(), nodes[4]));
    }

    #[test]
    fn test_bit_flip_in_root_rejected() {
        let nodes = leaves(4);
        let tree = MerkleTree::new(&nodes).unwrap();
        let proof = tree.proof(0).unwrap();
        let mut root = tree.root();
        root[31] ^= 0x01;
        assert!(!verify(&proof, root, nodes[0]));
    }

    #[test]
    fn test_wrong_depth_rejected() {
        let nodes = leaves(4);
        let tree = MerkleTree::new(&nodes).unwrap();
        let proof = tree.proof(1).unwrap();
        assert!(!verify_with_depth(&proof, tree.root(), nodes[1], tree.depth() + 1));
    }

    #[test]
    fn test_require_valid_proof_errors() {
        let nodes = leaves(2);
        let tree = MerkleTree::new(&nodes).unwrap();
        let proof = tree.proof(0).unwrap();

        assert!(require_valid_proof(&proof, tree.root(), nodes[0]).is_ok());

        let err = require_valid_proof(&proof, [0u8; 32], nodes[0]).unwrap_err();
        assert_eq!(err, GovernanceError::MerkleRootNotSet.into());

        let too_long = vec![[1u8; 32]; MAX_PROOF_DEPTH + 1];
        let err = require_valid_proof(&too_long, tree.root(), nodes[0]).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidMerkleInputs.into());

        let err = require_valid_proof(&proof, tree.root(), nodes[1]).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidMerkleProof.into());

        let err = require_valid_proof(&[], tree.root(), nodes[0]).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidMerkleProof.into());
    }
}
