//! Fuzz target for cast_vote and modify_vote
//!
//! Tests invariants:
//! - Basis points of every stored vote sum to 10000
//! - Per-outcome lamports never exceed the vote's stake
//! - Proposal totals equal the sum of validator contributions
//! - Re-applying the current split leaves the proposal unchanged
//!
//! Run with: cargo test --release -p validator-governance-fuzz vote_tally

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Fuzz cast_vote with unchecked splits and stakes
    #[test]
    fn fuzz_cast_vote(input in any::<CastVoteInput>()) {
        let result = simulate_cast_vote(&input);
        prop_assert!(
            !result.is_invariant_violation(),
            "cast_vote invariant violated: {:?}", result
        );
    }

    /// Validators voting without overrides
    #[test]
    fn fuzz_validator_votes_only(
        prior_votes in prop::collection::vec((arb_stake(), arb_vote_split()), 1..8),
        split in arb_vote_split(),
        modified_split in prop::option::of(arb_vote_split()),
        stake in arb_stake(),
    ) {
        let input = VoteTallyInput {
            validator_stake: stake,
            split,
            modified_split,
            overrides: Vec::new(),
            validator_first: true,
            prior_votes,
        };
        let result = simulate_vote_tally(&input);
        prop_assert!(result.is_success(), "tally failed: {:?}", result);
    }

    /// Truncation: lamports of a split never exceed the stake and lose at most 2
    #[test]
    fn fuzz_split_truncation(stake in arb_stake(), split in arb_vote_split()) {
        let (f, a, ab) = split;
        let lamports = validator_governance::instructions::tally_helpers::VoteSplit::new(f, a, ab)
            .unwrap()
            .lamports(stake)
            .unwrap();
        let total = lamports.for_votes as u128 + lamports.against_votes as u128
            + lamports.abstain_votes as u128;
        prop_assert!(total <= stake as u128);
        prop_assert!(stake as u128 - total <= 2);
    }
}
