//! Cast a validator vote on a proposal
//!
//! Voting power is the validator's active stake from its stored meta merkle
//! leaf. Delegators who already overrode part of that stake are netted out
//! through the validator's override cache.

use crate::errors::GovernanceError;
use crate::events::VoteCast;
use crate::instructions::proposal_helpers::require_vote_window;
use crate::instructions::tally_helpers::{
    apply_cast_vote, init_cache_if_new, require_meta_leaf, VoteSplit,
};
use crate::state::{ConsensusResult, MetaMerkleProof, Proposal, Vote, VoteOverrideCache};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct CastVote<'info> {
    #[account(
        mut,
        seeds = [b"proposal", proposal.seed.to_le_bytes().as_ref(), proposal.vote_account.as_ref()],
        bump = proposal.bump
    )]
    pub proposal: Box<Account<'info, Proposal>>,

    #[account(
        init,
        payer = signer,
        space = Vote::SIZE,
        seeds = [b"vote", proposal.key().as_ref(), spl_vote_account.key().as_ref()],
        bump
    )]
    pub vote: Box<Account<'info, Vote>>,

    #[account(
        init_if_needed,
        payer = signer,
        space = VoteOverrideCache::SIZE,
        seeds = [b"vote_override_cache", proposal.key().as_ref(), spl_vote_account.key().as_ref()],
        bump
    )]
    pub vote_override_cache: Box<Account<'info, VoteOverrideCache>>,

    pub meta_merkle_proof: Box<Account<'info, MetaMerkleProof>>,

    #[account(
        constraint = consensus_result.key() == meta_merkle_proof.consensus_result
            @ GovernanceError::InvalidConsensusResult
    )]
    pub consensus_result: Box<Account<'info, ConsensusResult>>,

    /// CHECK: Matched against the meta merkle leaf in handler
    pub spl_vote_account: UncheckedAccount<'info>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<CastVote>,
    for_votes_bp: u16,
    against_votes_bp: u16,
    abstain_votes_bp: u16,
) -> Result<()> {
    let split = VoteSplit::new(for_votes_bp, against_votes_bp, abstain_votes_bp)?;
    let signer = ctx.accounts.signer.key();
    let vote_account = ctx.accounts.spl_vote_account.key();
    let merkle_proof = &ctx.accounts.meta_merkle_proof;
    let clock = Clock::get()?;

    let proposal = &mut ctx.accounts.proposal;
    require_vote_window(proposal, clock.epoch)?;
    require_meta_leaf(proposal, merkle_proof, &vote_account)?;
    let leaf = merkle_proof.meta_merkle_leaf;
    require_keys_eq!(leaf.voting_wallet, signer, GovernanceError::Unauthorized);

    let cache = &mut ctx.accounts.vote_override_cache;
    init_cache_if_new(
        cache,
        &proposal.key(),
        &vote_account,
        ctx.bumps.vote_override_cache,
    );

    let vote = &mut ctx.accounts.vote;
    apply_cast_vote(proposal, vote, cache, split, leaf.active_stake)?;
    vote.proposal = proposal.key();
    vote.validator = vote_account;
    vote.voting_wallet = signer;
    vote.vote_timestamp = clock.unix_timestamp;
    vote.tie_breaker_consensus = ctx.accounts.consensus_result.tie_breaker_consensus;
    vote.bump = ctx.bumps.vote;

    emit!(VoteCast {
        proposal: proposal.key(),
        vote_account,
        voting_wallet: signer,
        for_votes_bp,
        against_votes_bp,
        abstain_votes_bp,
        stake: leaf.active_stake,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
