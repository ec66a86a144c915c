//! Governance invariant checking for fuzz testing
//!
//! Each check inspects program state after a helper ran and reports the
//! first violation found.

use std::collections::HashSet;

use validator_governance::instructions::tally_helpers::{effective_contribution, LamportSplit};
use validator_governance::state::{BallotBox, Proposal, Vote, VoteOverride, VoteOverrideCache};
use validator_governance::utils::stake::meets_threshold;

/// Vote tally invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyInvariantResult {
    Valid,
    SplitSumMismatch { sum: u32 },
    LamportsExceedStake { lamports: u64, stake: u64 },
    AggregateMismatch { expected: LamportSplit, actual: LamportSplit },
    OverrideExceedsStake { overridden: u64, stake: u64 },
    /// Netted lamports disagree with the validator split over the overridden stake
    NettingMismatch { expected: LamportSplit, actual: LamportSplit },
    /// Cache aggregate differs from the sum over its live override records
    CacheRecordMismatch {
        field: &'static str,
        cache: u64,
        records: u64,
    },
}

/// One validator's records as seen by the aggregate identity
pub struct ValidatorRecords<'a> {
    pub vote: Option<&'a Vote>,
    pub cache: &'a VoteOverrideCache,
    pub overrides: &'a [VoteOverride],
}

/// Ballot box invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BallotInvariantResult {
    Valid,
    TallySumMismatch { tallies: u64, operator_votes: u64 },
    DuplicateOperatorVote,
    UnknownOperator,
    DanglingBallotIndex { index: u16 },
    CapacityExceeded { len: usize, capacity: usize },
    WinnerBelowThreshold { tally: u64, voters: u64 },
    WinnerChanged,
    TieBreakerWithQuorum,
}

/// Merkle verification invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MerkleInvariantResult {
    Valid,
    HonestProofRejected { index: usize },
    TamperedLeafAccepted { index: usize },
    TamperedProofAccepted { index: usize, sibling: usize },
    TamperedRootAccepted { index: usize },
    WrongDepthAccepted { index: usize, depth: usize },
}

// ============================================================================
// Vote tally invariants
// ============================================================================

/// Basis points of a stored vote sum to exactly 10000
pub fn check_vote_split(vote: &Vote) -> TallyInvariantResult {
    let sum = vote.for_votes_bp as u32 + vote.against_votes_bp as u32 + vote.abstain_votes_bp as u32;
    if sum != 10_000 {
        return TallyInvariantResult::SplitSumMismatch { sum };
    }
    TallyInvariantResult::Valid
}

/// Truncation never hands out more lamports than the stake
pub fn check_vote_lamports(vote: &Vote) -> TallyInvariantResult {
    let lamports = vote.for_votes_lamports as u128
        + vote.against_votes_lamports as u128
        + vote.abstain_votes_lamports as u128;
    if lamports > vote.stake as u128 {
        return TallyInvariantResult::LamportsExceedStake {
            lamports: lamports.min(u64::MAX as u128) as u64,
            stake: vote.stake,
        };
    }
    TallyInvariantResult::Valid
}

/// Overridden stake never exceeds the validator's stake
pub fn check_override_bound(cache: &VoteOverrideCache, validator_stake: u64) -> TallyInvariantResult {
    if cache.total_stake > validator_stake {
        return TallyInvariantResult::OverrideExceedsStake {
            overridden: cache.total_stake,
            stake: validator_stake,
        };
    }
    TallyInvariantResult::Valid
}

/// Netted lamports equal the validator split applied to the overridden stake,
/// or zero while the validator has not voted
pub fn check_netting(vote: Option<&Vote>, cache: &VoteOverrideCache) -> TallyInvariantResult {
    let expected = match vote {
        Some(vote) => LamportSplit {
            for_votes: mul_bps(cache.total_stake, vote.for_votes_bp),
            against_votes: mul_bps(cache.total_stake, vote.against_votes_bp),
            abstain_votes: mul_bps(cache.total_stake, vote.abstain_votes_bp),
        },
        None => LamportSplit::default(),
    };
    let actual = LamportSplit::netted(cache);
    if expected != actual {
        return TallyInvariantResult::NettingMismatch { expected, actual };
    }
    TallyInvariantResult::Valid
}

fn mul_bps(stake: u64, bps: u16) -> u64 {
    ((stake as u128 * bps as u128) / 10_000) as u64
}

/// Cache totals equal the sums over the live override records
pub fn check_cache_matches_records(
    cache: &VoteOverrideCache,
    overrides: &[VoteOverride],
) -> TallyInvariantResult {
    let stake: u128 = overrides.iter().map(|o| o.stake_amount as u128).sum();
    let for_votes: u128 = overrides.iter().map(|o| o.for_votes_lamports as u128).sum();
    let against_votes: u128 = overrides.iter().map(|o| o.against_votes_lamports as u128).sum();
    let abstain_votes: u128 = overrides.iter().map(|o| o.abstain_votes_lamports as u128).sum();

    for (field, cache_value, records) in [
        ("total_stake", cache.total_stake, stake),
        ("override_count", cache.override_count, overrides.len() as u128),
        ("override_for_votes_lamports", cache.override_for_votes_lamports, for_votes),
        ("override_against_votes_lamports", cache.override_against_votes_lamports, against_votes),
        ("override_abstain_votes_lamports", cache.override_abstain_votes_lamports, abstain_votes),
    ] {
        if cache_value as u128 != records {
            return TallyInvariantResult::CacheRecordMismatch {
                field,
                cache: cache_value,
                records: records.min(u64::MAX as u128) as u64,
            };
        }
    }
    TallyInvariantResult::Valid
}

/// `proposal == base + sum(vote - cache) + sum(override records)` per outcome.
///
/// `base` is whatever the proposal held from validators outside `validators`.
/// The override term comes from the records themselves, not from the cache.
pub fn check_aggregate_identity(
    proposal: &Proposal,
    base: &LamportSplit,
    validators: &[ValidatorRecords<'_>],
) -> TallyInvariantResult {
    let actual = LamportSplit::of_proposal(proposal);
    let mut expected = *base;
    for validator in validators {
        let contribution = match validator.vote {
            Some(vote) => effective_contribution(vote, validator.cache),
            None => Ok(LamportSplit::default()),
        };
        let sum = contribution.and_then(|c| expected.checked_add(&c)).and_then(|sum| {
            validator.overrides.iter().try_fold(sum, |acc, vote_override| {
                acc.checked_add(&LamportSplit::of_override(vote_override))
            })
        });
        expected = match sum {
            Ok(sum) => sum,
            Err(_) => return TallyInvariantResult::AggregateMismatch { expected, actual },
        };
    }

    if expected != actual {
        return TallyInvariantResult::AggregateMismatch { expected, actual };
    }
    TallyInvariantResult::Valid
}

// ============================================================================
// Ballot box invariants
// ============================================================================

/// Tallies, operator votes and the voter list agree with each other
pub fn check_ballot_box_consistency(ballot_box: &BallotBox) -> BallotInvariantResult {
    let capacity = ballot_box.voter_list.len();
    for len in [ballot_box.ballot_tallies.len(), ballot_box.operator_votes.len()] {
        if len > capacity {
            return BallotInvariantResult::CapacityExceeded { len, capacity };
        }
    }

    let mut seen = HashSet::new();
    let mut counted = vec![0u64; ballot_box.ballot_tallies.len()];
    for vote in &ballot_box.operator_votes {
        if !seen.insert(vote.operator) {
            return BallotInvariantResult::DuplicateOperatorVote;
        }
        if !ballot_box.voter_list.contains(&vote.operator) {
            return BallotInvariantResult::UnknownOperator;
        }
        match counted.get_mut(vote.ballot_index as usize) {
            Some(count) => *count += 1,
            None => {
                return BallotInvariantResult::DanglingBallotIndex {
                    index: vote.ballot_index,
                }
            }
        }
    }

    for (tally, count) in ballot_box.ballot_tallies.iter().zip(&counted) {
        if tally.tally != *count {
            return BallotInvariantResult::TallySumMismatch {
                tallies: tally.tally,
                operator_votes: *count,
            };
        }
    }
    BallotInvariantResult::Valid
}

/// A quorum winner holds at least the threshold share of the voter list
pub fn check_winner_meets_threshold(ballot_box: &BallotBox) -> BallotInvariantResult {
    if !ballot_box.is_consensus_reached() {
        return BallotInvariantResult::Valid;
    }
    if ballot_box.tie_breaker_consensus {
        return BallotInvariantResult::TieBreakerWithQuorum;
    }

    let voters = ballot_box.voter_list.len() as u64;
    let tally = ballot_box
        .ballot_tallies
        .iter()
        .find(|t| t.ballot == ballot_box.winning_ballot)
        .map(|t| t.tally)
        .unwrap_or(0);
    if !meets_threshold(tally, voters, ballot_box.min_consensus_threshold_bps) {
        return BallotInvariantResult::WinnerBelowThreshold { tally, voters };
    }
    BallotInvariantResult::Valid
}

/// Once a winning ballot exists it never changes
pub fn check_winner_stable(before: &BallotBox, after: &BallotBox) -> BallotInvariantResult {
    if before.has_winning_ballot()
        && (before.winning_ballot != after.winning_ballot
            || before.tie_breaker_consensus != after.tie_breaker_consensus)
    {
        return BallotInvariantResult::WinnerChanged;
    }
    BallotInvariantResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::open_proposal;
    use validator_governance::instructions::tally_helpers::{
        apply_cast_override, apply_cast_vote, VoteSplit,
    };

    #[test]
    fn test_altered_override_record_breaks_identity() {
        let mut proposal = open_proposal();
        let mut vote = Vote::default();
        let mut cache = VoteOverrideCache::default();
        apply_cast_vote(
            &mut proposal,
            &mut vote,
            &mut cache,
            VoteSplit::new(6_000, 3_000, 1_000).unwrap(),
            1_000_000,
        )
        .unwrap();
        let mut record = VoteOverride::default();
        apply_cast_override(
            &mut proposal,
            Some(&mut vote),
            &mut cache,
            &mut record,
            VoteSplit::new(10_000, 0, 0).unwrap(),
            200_000,
            1_000_000,
        )
        .unwrap();
        assert_eq!(
            LamportSplit::of_proposal(&proposal),
            LamportSplit {
                for_votes: 680_000,
                against_votes: 240_000,
                abstain_votes: 80_000,
            }
        );

        let base = LamportSplit::default();
        let records = [record.clone()];
        let validators = [ValidatorRecords {
            vote: Some(&vote),
            cache: &cache,
            overrides: &records,
        }];
        assert_eq!(
            check_aggregate_identity(&proposal, &base, &validators),
            TallyInvariantResult::Valid
        );
        assert_eq!(
            check_cache_matches_records(&cache, &records),
            TallyInvariantResult::Valid
        );

        record.for_votes_lamports = 0;
        record.abstain_votes_lamports = 999;
        let altered = [record];
        let validators = [ValidatorRecords {
            vote: Some(&vote),
            cache: &cache,
            overrides: &altered,
        }];
        assert!(matches!(
            check_aggregate_identity(&proposal, &base, &validators),
            TallyInvariantResult::AggregateMismatch { .. }
        ));
        assert_eq!(
            check_cache_matches_records(&cache, &altered),
            TallyInvariantResult::CacheRecordMismatch {
                field: "override_for_votes_lamports",
                cache: 200_000,
                records: 0,
            }
        );
    }

    #[test]
    fn test_missing_override_record_detected() {
        let cache = VoteOverrideCache {
            total_stake: 500,
            override_count: 1,
            override_for_votes_lamports: 500,
            ..Default::default()
        };
        assert_eq!(
            check_cache_matches_records(&cache, &[]),
            TallyInvariantResult::CacheRecordMismatch {
                field: "total_stake",
                cache: 500,
                records: 0,
            }
        );
    }

    #[test]
    fn test_netting_zero_before_validator_votes() {
        let cache = VoteOverrideCache {
            total_stake: 500,
            override_for_votes_lamports: 500,
            ..Default::default()
        };
        assert_eq!(check_netting(None, &cache), TallyInvariantResult::Valid);
    }

    #[test]
    fn test_lamports_exceeding_stake_detected() {
        let vote = Vote {
            stake: 10,
            for_votes_lamports: 11,
            ..Default::default()
        };
        assert_eq!(
            check_vote_lamports(&vote),
            TallyInvariantResult::LamportsExceedStake {
                lamports: 11,
                stake: 10
            }
        );
    }

    #[test]
    fn test_override_bound_detected() {
        let cache = VoteOverrideCache {
            total_stake: 101,
            ..Default::default()
        };
        assert_eq!(check_override_bound(&cache, 101), TallyInvariantResult::Valid);
        assert_eq!(
            check_override_bound(&cache, 100),
            TallyInvariantResult::OverrideExceedsStake {
                overridden: 101,
                stake: 100
            }
        );
    }
}
