//! Fuzz target for cast_vote_override and modify_vote_override
//!
//! Tests invariants:
//! - proposal == sum(vote - cache) + sum(override records) per outcome
//! - Cache totals match the sum of live override records
//! - Netted lamports follow the validator split over the overridden stake
//! - Overridden stake never exceeds the validator's stake
//! - A rejected override leaves proposal and cache untouched
//! - The result does not depend on whether the validator votes first
//!
//! Run with: cargo test --release -p validator-governance-fuzz vote_override

use crate::*;
use proptest::prelude::*;
use validator_governance::instructions::tally_helpers::LamportSplit;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Fuzz overrides interleaved with a validator vote
    #[test]
    fn fuzz_vote_override(input in any::<VoteTallyInput>()) {
        let result = simulate_vote_tally(&input);
        prop_assert!(
            !result.is_invariant_violation(),
            "override invariant violated: {:?}", result
        );
    }

    /// Arrival order of validator vote and overrides does not change the totals
    #[test]
    fn fuzz_override_order_independent(input in any::<VoteTallyInput>()) {
        let mut first = input.clone();
        first.validator_first = true;
        first.modified_split = None;
        let mut last = first.clone();
        last.validator_first = false;

        prop_assert!(simulate_vote_tally(&first).is_success());
        prop_assert!(simulate_vote_tally(&last).is_success());
        prop_assert_eq!(final_totals(&first), final_totals(&last));
    }
}

/// Proposal totals after replaying the validator vote and overrides
fn final_totals(input: &VoteTallyInput) -> LamportSplit {
    use validator_governance::instructions::tally_helpers::{
        apply_cast_override, apply_cast_vote, VoteSplit,
    };
    use validator_governance::state::{Vote, VoteOverride, VoteOverrideCache};

    let split = |(f, a, ab): (u16, u16, u16)| VoteSplit::new(f, a, ab).unwrap();
    let mut proposal = open_proposal();
    let mut vote = Vote::default();
    let mut cache = VoteOverrideCache::default();
    let mut voted = false;

    if input.validator_first {
        apply_cast_vote(&mut proposal, &mut vote, &mut cache, split(input.split), input.validator_stake)
            .unwrap();
        voted = true;
    }
    for entry in &input.overrides {
        let stake_amount = ((input.validator_stake as u128 * entry.stake_share_bps as u128)
            / 10_000)
            .max(1) as u64;
        let mut vote_override = VoteOverride::default();
        // Over-budget overrides are rejected without side effects
        let _ = apply_cast_override(
            &mut proposal,
            if voted { Some(&mut vote) } else { None },
            &mut cache,
            &mut vote_override,
            split(entry.split),
            stake_amount,
            input.validator_stake,
        );
    }
    if !voted {
        apply_cast_vote(&mut proposal, &mut vote, &mut cache, split(input.split), input.validator_stake)
            .unwrap();
    }
    LamportSplit::of_proposal(&proposal)
}

#[cfg(test)]
mod edge_cases {
    use super::*;

    fn single_override(stake_share_bps: u16, validator_first: bool) -> VoteTallyInput {
        VoteTallyInput {
            validator_stake: 1_000_000,
            split: (6_000, 3_000, 1_000),
            modified_split: None,
            overrides: vec![OverrideInput {
                stake_share_bps,
                split: (10_000, 0, 0),
                modified_split: None,
            }],
            validator_first,
            prior_votes: Vec::new(),
        }
    }

    #[test]
    fn test_known_netting_example() {
        // 60/30/10 validator with 200,000 overridden all-for
        let input = single_override(2_000, true);
        assert_eq!(
            final_totals(&input),
            LamportSplit {
                for_votes: 680_000,
                against_votes: 240_000,
                abstain_votes: 80_000,
            }
        );
        assert_eq!(
            final_totals(&single_override(2_000, false)),
            final_totals(&input)
        );
    }

    #[test]
    fn test_full_override_removes_validator_weight() {
        let input = single_override(10_000, true);
        assert_eq!(simulate_vote_tally(&input), SimulationResult::Success);
        assert_eq!(
            final_totals(&input),
            LamportSplit {
                for_votes: 1_000_000,
                against_votes: 0,
                abstain_votes: 0,
            }
        );
    }
}
