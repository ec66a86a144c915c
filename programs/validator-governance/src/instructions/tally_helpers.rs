//! Shared helper functions for stake-weighted vote tallies.
//!
//! Used by `cast_vote`, `modify_vote`, `cast_vote_override` and
//! `modify_vote_override`.
//!
//! Per proposal and outcome the aggregates satisfy
//! `proposal == sum(vote - cache) + sum(cache.override)`, where `cache` holds
//! the validator lamports netted out for stake that delegators overrode.
//! Every helper computes all new values first and only then writes, so an
//! error leaves proposal, vote and cache unchanged.

use anchor_lang::prelude::*;

use crate::errors::GovernanceError;
use crate::instructions::constants::{BASIS_POINTS_DIVISOR, MAX_BPS};
use crate::state::{MetaMerkleProof, Proposal, Vote, VoteOverride, VoteOverrideCache};

/// Basis-point split of a vote across the three outcomes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoteSplit {
    pub for_votes_bp: u16,
    pub against_votes_bp: u16,
    pub abstain_votes_bp: u16,
}

impl VoteSplit {
    pub fn new(for_votes_bp: u16, against_votes_bp: u16, abstain_votes_bp: u16) -> Result<Self> {
        let sum = for_votes_bp as u32 + against_votes_bp as u32 + abstain_votes_bp as u32;
        require!(
            sum == MAX_BPS as u32,
            GovernanceError::InvalidVoteDistribution
        );
        Ok(Self {
            for_votes_bp,
            against_votes_bp,
            abstain_votes_bp,
        })
    }

    pub fn of_vote(vote: &Vote) -> Self {
        Self {
            for_votes_bp: vote.for_votes_bp,
            against_votes_bp: vote.against_votes_bp,
            abstain_votes_bp: vote.abstain_votes_bp,
        }
    }

    /// `stake * bp / 10000` per outcome, truncating
    pub fn lamports(&self, stake: u64) -> Result<LamportSplit> {
        Ok(LamportSplit {
            for_votes: bps_of(stake, self.for_votes_bp)?,
            against_votes: bps_of(stake, self.against_votes_bp)?,
            abstain_votes: bps_of(stake, self.abstain_votes_bp)?,
        })
    }
}

fn bps_of(stake: u64, bps: u16) -> Result<u64> {
    let lamports = (stake as u128)
        .checked_mul(bps as u128)
        .ok_or(GovernanceError::ArithmeticOverflow)?
        / BASIS_POINTS_DIVISOR as u128;
    u64::try_from(lamports).map_err(|_| error!(GovernanceError::ArithmeticOverflow))
}

/// Lamports per outcome
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LamportSplit {
    pub for_votes: u64,
    pub against_votes: u64,
    pub abstain_votes: u64,
}

impl LamportSplit {
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        Ok(Self {
            for_votes: self
                .for_votes
                .checked_add(other.for_votes)
                .ok_or(GovernanceError::ArithmeticOverflow)?,
            against_votes: self
                .against_votes
                .checked_add(other.against_votes)
                .ok_or(GovernanceError::ArithmeticOverflow)?,
            abstain_votes: self
                .abstain_votes
                .checked_add(other.abstain_votes)
                .ok_or(GovernanceError::ArithmeticOverflow)?,
        })
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        Ok(Self {
            for_votes: self
                .for_votes
                .checked_sub(other.for_votes)
                .ok_or(GovernanceError::ArithmeticOverflow)?,
            against_votes: self
                .against_votes
                .checked_sub(other.against_votes)
                .ok_or(GovernanceError::ArithmeticOverflow)?,
            abstain_votes: self
                .abstain_votes
                .checked_sub(other.abstain_votes)
                .ok_or(GovernanceError::ArithmeticOverflow)?,
        })
    }

    /// Replace `old` with `new` inside this total
    pub fn replace(&self, old: &Self, new: &Self) -> Result<Self> {
        self.checked_sub(old)?.checked_add(new)
    }

    pub fn of_proposal(proposal: &Proposal) -> Self {
        Self {
            for_votes: proposal.for_votes_lamports,
            against_votes: proposal.against_votes_lamports,
            abstain_votes: proposal.abstain_votes_lamports,
        }
    }

    pub fn of_vote(vote: &Vote) -> Self {
        Self {
            for_votes: vote.for_votes_lamports,
            against_votes: vote.against_votes_lamports,
            abstain_votes: vote.abstain_votes_lamports,
        }
    }

    pub fn of_override(vote_override: &VoteOverride) -> Self {
        Self {
            for_votes: vote_override.for_votes_lamports,
            against_votes: vote_override.against_votes_lamports,
            abstain_votes: vote_override.abstain_votes_lamports,
        }
    }

    /// Validator lamports netted out by the cache
    pub fn netted(cache: &VoteOverrideCache) -> Self {
        Self {
            for_votes: cache.for_votes_lamports,
            against_votes: cache.against_votes_lamports,
            abstain_votes: cache.abstain_votes_lamports,
        }
    }

    /// Sum of live override lamports in the cache
    pub fn overrides(cache: &VoteOverrideCache) -> Self {
        Self {
            for_votes: cache.override_for_votes_lamports,
            against_votes: cache.override_against_votes_lamports,
            abstain_votes: cache.override_abstain_votes_lamports,
        }
    }
}

fn write_proposal(proposal: &mut Proposal, totals: &LamportSplit) {
    proposal.for_votes_lamports = totals.for_votes;
    proposal.against_votes_lamports = totals.against_votes;
    proposal.abstain_votes_lamports = totals.abstain_votes;
}

fn write_vote(vote: &mut Vote, split: &VoteSplit, lamports: &LamportSplit) {
    vote.for_votes_bp = split.for_votes_bp;
    vote.against_votes_bp = split.against_votes_bp;
    vote.abstain_votes_bp = split.abstain_votes_bp;
    vote.for_votes_lamports = lamports.for_votes;
    vote.against_votes_lamports = lamports.against_votes;
    vote.abstain_votes_lamports = lamports.abstain_votes;
}

fn write_override(vote_override: &mut VoteOverride, split: &VoteSplit, lamports: &LamportSplit) {
    vote_override.for_votes_bp = split.for_votes_bp;
    vote_override.against_votes_bp = split.against_votes_bp;
    vote_override.abstain_votes_bp = split.abstain_votes_bp;
    vote_override.for_votes_lamports = lamports.for_votes;
    vote_override.against_votes_lamports = lamports.against_votes;
    vote_override.abstain_votes_lamports = lamports.abstain_votes;
}

fn write_netted(cache: &mut VoteOverrideCache, netted: &LamportSplit) {
    cache.for_votes_lamports = netted.for_votes;
    cache.against_votes_lamports = netted.against_votes;
    cache.abstain_votes_lamports = netted.abstain_votes;
}

fn write_overrides(cache: &mut VoteOverrideCache, overrides: &LamportSplit) {
    cache.override_for_votes_lamports = overrides.for_votes;
    cache.override_against_votes_lamports = overrides.against_votes;
    cache.override_abstain_votes_lamports = overrides.abstain_votes;
}

/// What a validator's vote adds to the proposal after override netting
pub fn effective_contribution(vote: &Vote, cache: &VoteOverrideCache) -> Result<LamportSplit> {
    LamportSplit::of_vote(vote).checked_sub(&LamportSplit::netted(cache))
}

/// Stored meta leaf must come from the proposal's snapshot and match the vote account
pub fn require_meta_leaf(
    proposal: &Proposal,
    merkle_proof: &MetaMerkleProof,
    vote_account: &Pubkey,
) -> Result<()> {
    require!(
        proposal.consensus_result == Some(merkle_proof.consensus_result),
        GovernanceError::InvalidConsensusResult
    );
    require_keys_eq!(
        merkle_proof.meta_merkle_leaf.vote_account,
        *vote_account,
        GovernanceError::InvalidVoteAccount
    );
    Ok(())
}

/// Fill identity fields of a cache created by `init_if_needed`
pub fn init_cache_if_new(
    cache: &mut VoteOverrideCache,
    proposal: &Pubkey,
    validator: &Pubkey,
    bump: u8,
) {
    if cache.proposal == Pubkey::default() {
        cache.proposal = *proposal;
        cache.validator = *validator;
        cache.bump = bump;
    }
}

/// Record a validator's first vote on a proposal
pub fn apply_cast_vote(
    proposal: &mut Proposal,
    vote: &mut Vote,
    cache: &mut VoteOverrideCache,
    split: VoteSplit,
    stake: u64,
) -> Result<()> {
    require!(stake > 0, GovernanceError::NotEnoughStake);
    require!(
        cache.total_stake <= stake,
        GovernanceError::OverrideExceedsStake
    );

    let lamports = split.lamports(stake)?;
    let netted = split.lamports(cache.total_stake)?;
    let effective = lamports.checked_sub(&netted)?;
    let totals = LamportSplit::of_proposal(proposal).checked_add(&effective)?;
    let vote_count = proposal
        .vote_count
        .checked_add(1)
        .ok_or(GovernanceError::ArithmeticOverflow)?;

    write_vote(vote, &split, &lamports);
    vote.stake = stake;
    vote.override_lamports = cache.total_stake;
    write_netted(cache, &netted);
    cache.validator_voted = true;
    write_proposal(proposal, &totals);
    proposal.vote_count = vote_count;
    Ok(())
}

/// Replace a validator's split, keeping its stake
pub fn apply_modify_vote(
    proposal: &mut Proposal,
    vote: &mut Vote,
    cache: &mut VoteOverrideCache,
    split: VoteSplit,
) -> Result<()> {
    let old_effective = effective_contribution(vote, cache)?;
    let lamports = split.lamports(vote.stake)?;
    let netted = split.lamports(cache.total_stake)?;
    let new_effective = lamports.checked_sub(&netted)?;
    let totals =
        LamportSplit::of_proposal(proposal).replace(&old_effective, &new_effective)?;

    write_vote(vote, &split, &lamports);
    write_netted(cache, &netted);
    write_proposal(proposal, &totals);
    Ok(())
}

/// Record a delegator override for one stake account.
///
/// `vote` must be present whenever the cache says the validator voted.
/// `validator_stake` bounds the total stake that may be overridden.
pub fn apply_cast_override(
    proposal: &mut Proposal,
    vote: Option<&mut Vote>,
    cache: &mut VoteOverrideCache,
    vote_override: &mut VoteOverride,
    split: VoteSplit,
    stake_amount: u64,
    validator_stake: u64,
) -> Result<()> {
    require!(stake_amount > 0, GovernanceError::NotEnoughStake);
    let total_stake = cache
        .total_stake
        .checked_add(stake_amount)
        .ok_or(GovernanceError::ArithmeticOverflow)?;
    require!(
        total_stake <= validator_stake,
        GovernanceError::OverrideExceedsStake
    );

    let override_lamports = split.lamports(stake_amount)?;
    let overrides = LamportSplit::overrides(cache).checked_add(&override_lamports)?;
    let override_count = cache
        .override_count
        .checked_add(1)
        .ok_or(GovernanceError::ArithmeticOverflow)?;
    let mut totals = LamportSplit::of_proposal(proposal).checked_add(&override_lamports)?;

    let voted = if cache.validator_voted {
        let vote = vote.ok_or(GovernanceError::InvalidVoteAccount)?;
        require!(
            total_stake <= vote.stake,
            GovernanceError::OverrideExceedsStake
        );
        let old_netted = LamportSplit::netted(cache);
        let netted = VoteSplit::of_vote(vote).lamports(total_stake)?;
        // Validator contribution shrinks by the newly netted lamports
        totals = totals.checked_add(&old_netted)?.checked_sub(&netted)?;
        Some((vote, netted))
    } else {
        None
    };

    write_override(vote_override, &split, &override_lamports);
    vote_override.stake_amount = stake_amount;
    write_overrides(cache, &overrides);
    cache.override_count = override_count;
    cache.total_stake = total_stake;
    if let Some((vote, netted)) = voted {
        write_netted(cache, &netted);
        vote.override_lamports = total_stake;
    }
    write_proposal(proposal, &totals);
    Ok(())
}

/// Replace a delegator's split, keeping its stake
pub fn apply_modify_override(
    proposal: &mut Proposal,
    cache: &mut VoteOverrideCache,
    vote_override: &mut VoteOverride,
    split: VoteSplit,
) -> Result<()> {
    let old_lamports = LamportSplit::of_override(vote_override);
    let new_lamports = split.lamports(vote_override.stake_amount)?;
    let overrides = LamportSplit::overrides(cache).replace(&old_lamports, &new_lamports)?;
    let totals = LamportSplit::of_proposal(proposal).replace(&old_lamports, &new_lamports)?;

    write_override(vote_override, &split, &new_lamports);
    write_overrides(cache, &overrides);
    write_proposal(proposal, &totals);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(f: u16, a: u16, ab: u16) -> VoteSplit {
        VoteSplit::new(f, a, ab).unwrap()
    }

    fn lamports(f: u64, a: u64, ab: u64) -> LamportSplit {
        LamportSplit {
            for_votes: f,
            against_votes: a,
            abstain_votes: ab,
        }
    }

    fn empty_proposal() -> Proposal {
        Proposal {
            author: Pubkey::default(),
            vote_account: Pubkey::default(),
            seed: 0,
            index: 0,
            title: String::new(),
            description: String::new(),
            creation_epoch: 0,
            creation_timestamp: 0,
            start_epoch: 0,
            end_epoch: 0,
            proposer_stake_weight_bps: 0,
            cluster_support_lamports: 0,
            for_votes_lamports: 0,
            against_votes_lamports: 0,
            abstain_votes_lamports: 0,
            vote_count: 0,
            voting: true,
            finalized: false,
            consensus_result: None,
            snapshot_slot: 0,
            bump: 0,
        }
    }

    /// sum(vote - cache) + sum(cache.override) for one validator
    fn identity_total(vote: Option<&Vote>, cache: &VoteOverrideCache) -> LamportSplit {
        let validator = match vote {
            Some(vote) => effective_contribution(vote, cache).unwrap(),
            None => LamportSplit::default(),
        };
        validator
            .checked_add(&LamportSplit::overrides(cache))
            .unwrap()
    }

    #[test]
    fn test_split_must_sum_to_10000() {
        assert!(VoteSplit::new(10000, 0, 0).is_ok());
        assert!(VoteSplit::new(3333, 3333, 3334).is_ok());
        let err = VoteSplit::new(5000, 5000, 1).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidVoteDistribution.into());
        let err = VoteSplit::new(u16::MAX, u16::MAX, 2).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidVoteDistribution.into());
    }

    #[test]
    fn test_lamports_truncate() {
        let l = split(3333, 3333, 3334).lamports(10).unwrap();
        assert_eq!(l, lamports(3, 3, 3));
        let l = split(10000, 0, 0).lamports(u64::MAX).unwrap();
        assert_eq!(l.for_votes, u64::MAX);
    }

    #[test]
    fn test_validator_then_delegator_override() {
        let mut proposal = empty_proposal();
        let mut vote = Vote::default();
        let mut cache = VoteOverrideCache::default();

        apply_cast_vote(
            &mut proposal,
            &mut vote,
            &mut cache,
            split(6000, 3000, 1000),
            1_000_000,
        )
        .unwrap();
        assert_eq!(
            LamportSplit::of_proposal(&proposal),
            lamports(600_000, 300_000, 100_000)
        );
        assert_eq!(proposal.vote_count, 1);
        assert!(cache.validator_voted);

        let mut vote_override = VoteOverride::default();
        apply_cast_override(
            &mut proposal,
            Some(&mut vote),
            &mut cache,
            &mut vote_override,
            split(10000, 0, 0),
            200_000,
            1_000_000,
        )
        .unwrap();

        assert_eq!(
            LamportSplit::netted(&cache),
            lamports(120_000, 60_000, 20_000)
        );
        assert_eq!(
            effective_contribution(&vote, &cache).unwrap(),
            lamports(480_000, 240_000, 80_000)
        );
        assert_eq!(
            LamportSplit::of_override(&vote_override),
            lamports(200_000, 0, 0)
        );
        assert_eq!(
            LamportSplit::of_proposal(&proposal),
            lamports(680_000, 240_000, 80_000)
        );
        assert_eq!(vote.override_lamports, 200_000);
        assert_eq!(cache.override_count, 1);
        assert_eq!(
            identity_total(Some(&vote), &cache),
            LamportSplit::of_proposal(&proposal)
        );
    }

    #[test]
    fn test_override_before_validator_votes() {
        let mut proposal = empty_proposal();
        let mut cache = VoteOverrideCache::default();
        let mut vote_override = VoteOverride::default();

        apply_cast_override(
            &mut proposal,
            None,
            &mut cache,
            &mut vote_override,
            split(10000, 0, 0),
            200_000,
            1_000_000,
        )
        .unwrap();
        assert_eq!(
            LamportSplit::of_proposal(&proposal),
            lamports(200_000, 0, 0)
        );
        assert_eq!(LamportSplit::netted(&cache), LamportSplit::default());

        let mut vote = Vote::default();
        apply_cast_vote(
            &mut proposal,
            &mut vote,
            &mut cache,
            split(6000, 3000, 1000),
            1_000_000,
        )
        .unwrap();

        // Same aggregates as when the validator voted first
        assert_eq!(
            LamportSplit::of_proposal(&proposal),
            lamports(680_000, 240_000, 80_000)
        );
        assert_eq!(vote.override_lamports, 200_000);
        assert_eq!(
            identity_total(Some(&vote), &cache),
            LamportSplit::of_proposal(&proposal)
        );
    }

    #[test]
    fn test_modify_vote_renets_overrides() {
        let mut proposal = empty_proposal();
        let mut vote = Vote::default();
        let mut cache = VoteOverrideCache::default();
        let mut vote_override = VoteOverride::default();

        apply_cast_vote(&mut proposal, &mut vote, &mut cache, split(6000, 3000, 1000), 1_000_000)
            .unwrap();
        apply_cast_override(
            &mut proposal,
            Some(&mut vote),
            &mut cache,
            &mut vote_override,
            split(10000, 0, 0),
            200_000,
            1_000_000,
        )
        .unwrap();

        apply_modify_vote(&mut proposal, &mut vote, &mut cache, split(0, 10000, 0)).unwrap();
        assert_eq!(LamportSplit::netted(&cache), lamports(0, 200_000, 0));
        assert_eq!(
            LamportSplit::of_proposal(&proposal),
            lamports(200_000, 800_000, 0)
        );
        assert_eq!(proposal.vote_count, 1);
        assert_eq!(
            identity_total(Some(&vote), &cache),
            LamportSplit::of_proposal(&proposal)
        );
    }

    #[test]
    fn test_modify_with_same_values_is_noop() {
        let mut proposal = empty_proposal();
        let mut vote = Vote::default();
        let mut cache = VoteOverrideCache::default();
        let mut vote_override = VoteOverride::default();

        apply_cast_vote(&mut proposal, &mut vote, &mut cache, split(3333, 3333, 3334), 999_999)
            .unwrap();
        apply_cast_override(
            &mut proposal,
            Some(&mut vote),
            &mut cache,
            &mut vote_override,
            split(2500, 2500, 5000),
            123_457,
            999_999,
        )
        .unwrap();

        let before = (
            LamportSplit::of_proposal(&proposal),
            LamportSplit::of_vote(&vote),
            LamportSplit::netted(&cache),
            LamportSplit::overrides(&cache),
        );

        apply_modify_vote(&mut proposal, &mut vote, &mut cache, split(3333, 3333, 3334)).unwrap();
        apply_modify_override(
            &mut proposal,
            &mut cache,
            &mut vote_override,
            split(2500, 2500, 5000),
        )
        .unwrap();

        let after = (
            LamportSplit::of_proposal(&proposal),
            LamportSplit::of_vote(&vote),
            LamportSplit::netted(&cache),
            LamportSplit::overrides(&cache),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_modify_override() {
        let mut proposal = empty_proposal();
        let mut vote = Vote::default();
        let mut cache = VoteOverrideCache::default();
        let mut vote_override = VoteOverride::default();

        apply_cast_vote(&mut proposal, &mut vote, &mut cache, split(6000, 3000, 1000), 1_000_000)
            .unwrap();
        apply_cast_override(
            &mut proposal,
            Some(&mut vote),
            &mut cache,
            &mut vote_override,
            split(10000, 0, 0),
            200_000,
            1_000_000,
        )
        .unwrap();
        apply_modify_override(
            &mut proposal,
            &mut cache,
            &mut vote_override,
            split(0, 0, 10000),
        )
        .unwrap();

        assert_eq!(LamportSplit::overrides(&cache), lamports(0, 0, 200_000));
        assert_eq!(
            LamportSplit::of_proposal(&proposal),
            lamports(480_000, 240_000, 280_000)
        );
        assert_eq!(
            identity_total(Some(&vote), &cache),
            LamportSplit::of_proposal(&proposal)
        );
    }

    #[test]
    fn test_override_requires_vote_once_validator_voted() {
        let mut proposal = empty_proposal();
        let mut vote = Vote::default();
        let mut cache = VoteOverrideCache::default();
        apply_cast_vote(&mut proposal, &mut vote, &mut cache, split(10000, 0, 0), 1_000)
            .unwrap();

        let before = LamportSplit::of_proposal(&proposal);
        let mut vote_override = VoteOverride::default();
        let err = apply_cast_override(
            &mut proposal,
            None,
            &mut cache,
            &mut vote_override,
            split(0, 10000, 0),
            100,
            1_000,
        )
        .unwrap_err();
        assert_eq!(err, GovernanceError::InvalidVoteAccount.into());
        assert_eq!(LamportSplit::of_proposal(&proposal), before);
        assert_eq!(cache.total_stake, 0);
        assert_eq!(cache.override_count, 0);
    }

    #[test]
    fn test_override_cannot_exceed_validator_stake() {
        let mut proposal = empty_proposal();
        let mut cache = VoteOverrideCache::default();
        let mut first = VoteOverride::default();
        apply_cast_override(
            &mut proposal,
            None,
            &mut cache,
            &mut first,
            split(10000, 0, 0),
            600,
            1_000,
        )
        .unwrap();

        let mut second = VoteOverride::default();
        let err = apply_cast_override(
            &mut proposal,
            None,
            &mut cache,
            &mut second,
            split(10000, 0, 0),
            401,
            1_000,
        )
        .unwrap_err();
        assert_eq!(err, GovernanceError::OverrideExceedsStake.into());
        assert_eq!(cache.total_stake, 600);
        assert_eq!(proposal.for_votes_lamports, 600);
    }

    #[test]
    fn test_full_override_nets_validator_to_zero() {
        let mut proposal = empty_proposal();
        let mut vote = Vote::default();
        let mut cache = VoteOverrideCache::default();
        apply_cast_vote(&mut proposal, &mut vote, &mut cache, split(5000, 5000, 0), 1_001)
            .unwrap();

        let mut vote_override = VoteOverride::default();
        apply_cast_override(
            &mut proposal,
            Some(&mut vote),
            &mut cache,
            &mut vote_override,
            split(0, 0, 10000),
            1_001,
            1_001,
        )
        .unwrap();

        assert_eq!(
            effective_contribution(&vote, &cache).unwrap(),
            LamportSplit::default()
        );
        assert_eq!(LamportSplit::of_proposal(&proposal), lamports(0, 0, 1_001));
    }

    #[test]
    fn test_require_meta_leaf() {
        let mut proposal = empty_proposal();
        let result = Pubkey::new_unique();
        let vote_account = Pubkey::new_unique();
        let merkle_proof = MetaMerkleProof {
            payer: Pubkey::new_unique(),
            consensus_result: result,
            meta_merkle_leaf: crate::state::MetaMerkleLeaf {
                voting_wallet: Pubkey::new_unique(),
                vote_account,
                stake_merkle_root: [1u8; 32],
                active_stake: 10,
            },
            meta_merkle_proof: Vec::new(),
            close_timestamp: 0,
            bump: 0,
        };

        let err = require_meta_leaf(&proposal, &merkle_proof, &vote_account).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidConsensusResult.into());

        proposal.consensus_result = Some(result);
        require_meta_leaf(&proposal, &merkle_proof, &vote_account).unwrap();

        let err =
            require_meta_leaf(&proposal, &merkle_proof, &Pubkey::new_unique()).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidVoteAccount.into());
    }

    #[test]
    fn test_init_cache_only_once() {
        let mut cache = VoteOverrideCache::default();
        let proposal = Pubkey::new_unique();
        let validator = Pubkey::new_unique();
        init_cache_if_new(&mut cache, &proposal, &validator, 7);
        cache.total_stake = 50;
        init_cache_if_new(&mut cache, &proposal, &validator, 9);
        assert_eq!(cache.bump, 7);
        assert_eq!(cache.total_stake, 50);
        assert_eq!(cache.validator, validator);
    }

    #[test]
    fn test_cast_vote_requires_stake() {
        let mut proposal = empty_proposal();
        let mut vote = Vote::default();
        let mut cache = VoteOverrideCache::default();
        let err = apply_cast_vote(&mut proposal, &mut vote, &mut cache, split(10000, 0, 0), 0)
            .unwrap_err();
        assert_eq!(err, GovernanceError::NotEnoughStake.into());
        assert_eq!(proposal.vote_count, 0);
    }
}
