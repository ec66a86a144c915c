//! Shared helper functions for the proposal lifecycle.
//!
//! A proposal moves Support -> Voting -> Finalized. These helpers hold the
//! transition rules so instructions only load accounts and emit events.

use anchor_lang::prelude::*;

use crate::errors::GovernanceError;
use crate::state::Proposal;
use crate::utils::stake::meets_threshold;
use crate::utils::validation::validate_proposal_text;

/// Validate a requested voting window and return its end epoch
pub fn validate_timing(
    start_epoch: u64,
    voting_length_epochs: u64,
    current_epoch: u64,
    max_voting_length_epochs: u64,
) -> Result<u64> {
    require!(
        start_epoch >= current_epoch,
        GovernanceError::InvalidStartEpoch
    );
    require!(
        voting_length_epochs >= 1 && voting_length_epochs <= max_voting_length_epochs,
        GovernanceError::InvalidVotingLength
    );
    let end_epoch = start_epoch
        .checked_add(voting_length_epochs)
        .ok_or(GovernanceError::ArithmeticOverflow)?;
    Ok(end_epoch)
}

/// Inputs for a new proposal
pub struct ProposalParams {
    pub author: Pubkey,
    pub vote_account: Pubkey,
    pub seed: u64,
    pub index: u64,
    pub title: String,
    pub description: String,
    pub start_epoch: u64,
    pub voting_length_epochs: u64,
    pub max_voting_length_epochs: u64,
    pub proposer_stake_weight_bps: u64,
    pub current_epoch: u64,
    pub now: i64,
    pub bump: u8,
}

pub fn initialize_proposal(proposal: &mut Proposal, params: ProposalParams) -> Result<()> {
    validate_proposal_text(&params.title, &params.description)?;
    let end_epoch = validate_timing(
        params.start_epoch,
        params.voting_length_epochs,
        params.current_epoch,
        params.max_voting_length_epochs,
    )?;

    proposal.author = params.author;
    proposal.vote_account = params.vote_account;
    proposal.seed = params.seed;
    proposal.index = params.index;
    proposal.title = params.title;
    proposal.description = params.description;
    proposal.creation_epoch = params.current_epoch;
    proposal.creation_timestamp = params.now;
    proposal.start_epoch = params.start_epoch;
    proposal.end_epoch = end_epoch;
    proposal.proposer_stake_weight_bps = params.proposer_stake_weight_bps;
    proposal.cluster_support_lamports = 0;
    proposal.for_votes_lamports = 0;
    proposal.against_votes_lamports = 0;
    proposal.abstain_votes_lamports = 0;
    proposal.vote_count = 0;
    proposal.voting = false;
    proposal.finalized = false;
    proposal.consensus_result = None;
    proposal.snapshot_slot = 0;
    proposal.bump = params.bump;
    Ok(())
}

/// Proposal must still be gathering support
pub fn require_support_phase(proposal: &Proposal) -> Result<()> {
    require!(!proposal.finalized, GovernanceError::ProposalFinalized);
    require!(!proposal.voting, GovernanceError::ProposalClosed);
    Ok(())
}

/// Add a validator's support and open voting once the threshold is met.
///
/// Returns true when this support moved the proposal into voting.
pub fn record_support(
    proposal: &mut Proposal,
    stake: u64,
    total_stake: u64,
    support_threshold_bps: u16,
    current_epoch: u64,
    current_slot: u64,
) -> Result<bool> {
    require_support_phase(proposal)?;
    require!(stake > 0, GovernanceError::NotEnoughStake);

    let cluster_support_lamports = proposal
        .cluster_support_lamports
        .checked_add(stake)
        .ok_or(GovernanceError::ArithmeticOverflow)?;
    let activated = meets_threshold(cluster_support_lamports, total_stake, support_threshold_bps);

    let (start_epoch, end_epoch) = if activated && current_epoch > proposal.start_epoch {
        let end_epoch = current_epoch
            .checked_add(proposal.voting_length_epochs())
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        (current_epoch, end_epoch)
    } else {
        (proposal.start_epoch, proposal.end_epoch)
    };

    proposal.cluster_support_lamports = cluster_support_lamports;
    if activated {
        proposal.voting = true;
        proposal.snapshot_slot = current_slot;
        proposal.start_epoch = start_epoch;
        proposal.end_epoch = end_epoch;
    }
    Ok(activated)
}

/// Author-only retiming while the proposal is still in support
pub fn adjust_timing(
    proposal: &mut Proposal,
    signer: &Pubkey,
    start_epoch: u64,
    voting_length_epochs: u64,
    current_epoch: u64,
    max_voting_length_epochs: u64,
) -> Result<()> {
    require_keys_eq!(proposal.author, *signer, GovernanceError::Unauthorized);
    require!(
        !proposal.voting && !proposal.finalized,
        GovernanceError::CannotModifyAfterStart
    );
    let end_epoch = validate_timing(
        start_epoch,
        voting_length_epochs,
        current_epoch,
        max_voting_length_epochs,
    )?;

    proposal.start_epoch = start_epoch;
    proposal.end_epoch = end_epoch;
    Ok(())
}

/// Bind the certified snapshot for the proposal's snapshot slot
pub fn bind_consensus_result(
    proposal: &mut Proposal,
    consensus_result: Pubkey,
    result_snapshot_slot: u64,
) -> Result<()> {
    require!(!proposal.finalized, GovernanceError::ProposalFinalized);
    require!(proposal.voting, GovernanceError::VotingNotStarted);
    require!(
        proposal.consensus_result.is_none(),
        GovernanceError::MerkleRootAlreadySet
    );
    require!(
        result_snapshot_slot == proposal.snapshot_slot,
        GovernanceError::InvalidConsensusResult
    );

    proposal.consensus_result = Some(consensus_result);
    Ok(())
}

/// Guard shared by every vote and override operation
pub fn require_vote_window(proposal: &Proposal, current_epoch: u64) -> Result<()> {
    require!(!proposal.finalized, GovernanceError::ProposalFinalized);
    require!(
        proposal.voting && current_epoch >= proposal.start_epoch,
        GovernanceError::VotingNotStarted
    );
    require!(
        current_epoch <= proposal.end_epoch,
        GovernanceError::ProposalClosed
    );
    require!(
        proposal.consensus_result.is_some(),
        GovernanceError::MerkleRootNotSet
    );
    Ok(())
}

pub fn finalize(proposal: &mut Proposal, current_epoch: u64) -> Result<()> {
    require!(!proposal.finalized, GovernanceError::ProposalFinalized);
    require!(proposal.voting, GovernanceError::VotingNotStarted);
    require!(
        current_epoch > proposal.end_epoch,
        GovernanceError::VotingPeriodNotEnded
    );

    proposal.finalized = true;
    Ok(())
}
