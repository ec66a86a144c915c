//! Fuzz target for the snapshot ballot box
//!
//! Tests invariants:
//! - Tallies always match the recorded operator votes
//! - Only whitelisted operators vote, each at most once
//! - A quorum winner meets the consensus threshold
//! - The winning ballot never changes once set
//! - The tie-breaker only applies after expiry without consensus
//! - The tie-breaker picks a ballot operators voted for, when there is one
//! - An expired box without a winner can be discarded, a decided one cannot
//!
//! Run with: cargo test --release -p validator-governance-fuzz ballot_box

use crate::*;
use proptest::prelude::*;
use validator_governance::instructions::ballot_helpers::record_operator_vote;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Fuzz operator votes and removals
    #[test]
    fn fuzz_ballot_box(input in any::<BallotBoxInput>()) {
        let result = simulate_ballot_box(&input);
        prop_assert!(
            !result.is_invariant_violation(),
            "ballot box invariant violated: {:?}", result
        );
    }

    /// Unanimous operators always reach consensus, and on the last vote needed
    #[test]
    fn fuzz_unanimous_consensus(
        operator_count in arb_operator_count(),
        threshold_bps in arb_threshold_bps(),
        choice in 1u8..4u8,
    ) {
        let mut ballot_box = new_ballot_box(operator_count, threshold_bps).unwrap();
        let ballot = candidate_ballot(choice);
        let needed = ((operator_count as u128 * threshold_bps as u128 + 9_999) / 10_000).max(1) as usize;

        for i in 0..operator_count {
            let reached = record_operator_vote(
                &mut ballot_box,
                &operator_key(i),
                &ballot,
                NOW,
                SNAPSHOT_SLOT + 1 + i as u64,
            )
            .unwrap();
            prop_assert_eq!(reached, i + 1 == needed);
            if reached {
                break;
            }
        }
        prop_assert_eq!(ballot_box.winning_ballot, ballot);
        prop_assert_eq!(check_ballot_box_consistency(&ballot_box), BallotInvariantResult::Valid);
        prop_assert_eq!(check_winner_meets_threshold(&ballot_box), BallotInvariantResult::Valid);
    }
}
