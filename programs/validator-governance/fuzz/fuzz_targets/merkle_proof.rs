//! Fuzz target for merkle proof verification
//!
//! Tests invariants:
//! - Honest proofs from the tree builder always verify
//! - Changing one byte of leaf, sibling or root breaks verification
//! - Proofs of the wrong length are rejected
//!
//! Run with: cargo test --release -p validator-governance-fuzz merkle_proof

use crate::*;
use proptest::prelude::*;
use validator_governance::utils::merkle::{hash_leaf_fields, verify, MerkleTree};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Fuzz proofs against tampering
    #[test]
    fn fuzz_merkle_proof(input in any::<MerkleProofInput>()) {
        let result = simulate_merkle_proof(&input);
        prop_assert!(result.is_success(), "merkle check failed: {:?}", result);
    }

    /// A proof for one leaf never verifies a different leaf
    #[test]
    fn fuzz_proof_bound_to_leaf(
        raw in prop::collection::vec(arb_bytes32(), 2..32),
        index in any::<prop::sample::Index>(),
        other in any::<prop::sample::Index>(),
    ) {
        let leaves: Vec<[u8; 32]> = raw.iter().map(|r| hash_leaf_fields(&[&r[..]])).collect();
        let tree = MerkleTree::new(&leaves).unwrap();
        let index = index.index(leaves.len());
        let other = other.index(leaves.len());
        prop_assume!(leaves[index] != leaves[other]);

        let proof = tree.proof(index).unwrap();
        prop_assert!(!verify(&proof, tree.root(), leaves[other]));
    }
}
