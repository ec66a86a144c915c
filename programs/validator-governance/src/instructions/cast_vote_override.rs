//! Override a validator's vote for one delegated stake account
//!
//! The delegator proves its stake leaf against the validator's stake merkle
//! root, which itself was verified into the stored meta merkle leaf. Once the
//! validator has voted, its Vote account must be passed so the overridden
//! stake can be netted out of it.

use crate::errors::GovernanceError;
use crate::events::VoteOverrideCast;
use crate::instructions::proposal_helpers::require_vote_window;
use crate::instructions::tally_helpers::{
    apply_cast_override, init_cache_if_new, require_meta_leaf, VoteSplit,
};
use crate::state::{
    ConsensusResult, MetaMerkleProof, Proposal, StakeMerkleLeaf, Vote, VoteOverride,
    VoteOverrideCache,
};
use crate::utils::merkle::require_valid_proof;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(
    for_votes_bp: u16,
    against_votes_bp: u16,
    abstain_votes_bp: u16,
    stake_merkle_proof: Vec<[u8; 32]>,
    stake_merkle_leaf: StakeMerkleLeaf
)]
pub struct CastVoteOverride<'info> {
    #[account(
        mut,
        seeds = [b"proposal", proposal.seed.to_le_bytes().as_ref(), proposal.vote_account.as_ref()],
        bump = proposal.bump
    )]
    pub proposal: Box<Account<'info, Proposal>>,

    #[account(
        mut,
        seeds = [b"vote", proposal.key().as_ref(), spl_vote_account.key().as_ref()],
        bump
    )]
    pub validator_vote: Option<Account<'info, Vote>>,

    #[account(
        init,
        payer = signer,
        space = VoteOverride::SIZE,
        seeds = [
            b"vote_override",
            proposal.key().as_ref(),
            stake_merkle_leaf.stake_account.as_ref(),
            spl_vote_account.key().as_ref()
        ],
        bump
    )]
    pub vote_override: Box<Account<'info, VoteOverride>>,

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
    ctx: Context<CastVoteOverride>,
    for_votes_bp: u16,
    against_votes_bp: u16,
    abstain_votes_bp: u16,
    stake_merkle_proof: Vec<[u8; 32]>,
    stake_merkle_leaf: StakeMerkleLeaf,
) -> Result<()> {
    let split = VoteSplit::new(for_votes_bp, against_votes_bp, abstain_votes_bp)?;
    let signer = ctx.accounts.signer.key();
    let vote_account = ctx.accounts.spl_vote_account.key();
    let merkle_proof = &ctx.accounts.meta_merkle_proof;
    let clock = Clock::get()?;

    let proposal = &mut ctx.accounts.proposal;
    require_vote_window(proposal, clock.epoch)?;
    require_meta_leaf(proposal, merkle_proof, &vote_account)?;
    let meta_leaf = merkle_proof.meta_merkle_leaf;

    require_keys_eq!(
        stake_merkle_leaf.voting_wallet,
        signer,
        GovernanceError::Unauthorized
    );
    require_valid_proof(
        &stake_merkle_proof,
        meta_leaf.stake_merkle_root,
        stake_merkle_leaf.hash(),
    )?;

    let cache = &mut ctx.accounts.vote_override_cache;
    init_cache_if_new(
        cache,
        &proposal.key(),
        &vote_account,
        ctx.bumps.vote_override_cache,
    );

    let vote_override = &mut ctx.accounts.vote_override;
    let validator_vote = ctx
        .accounts
        .validator_vote
        .as_mut()
        .map(|vote| &mut **vote);
    apply_cast_override(
        proposal,
        validator_vote,
        cache,
        vote_override,
        split,
        stake_merkle_leaf.active_stake,
        meta_leaf.active_stake,
    )?;

    vote_override.proposal = proposal.key();
    vote_override.validator = vote_account;
    vote_override.stake_account = stake_merkle_leaf.stake_account;
    vote_override.delegator = signer;
    vote_override.vote_override_timestamp = clock.unix_timestamp;
    vote_override.tie_breaker_consensus = ctx.accounts.consensus_result.tie_breaker_consensus;
    vote_override.bump = ctx.bumps.vote_override;

    emit!(VoteOverrideCast {
        proposal: proposal.key(),
        vote_account,
        stake_account: stake_merkle_leaf.stake_account,
        delegator: signer,
        for_votes_bp,
        against_votes_bp,
        abstain_votes_bp,
        stake_amount: stake_merkle_leaf.active_stake,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
