//! Change the split of an existing validator vote

use crate::errors::GovernanceError;
use crate::events::VoteModified;
use crate::instructions::proposal_helpers::require_vote_window;
use crate::instructions::tally_helpers::{apply_modify_vote, VoteSplit};
use crate::state::{Proposal, Vote, VoteOverrideCache};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct ModifyVote<'info> {
    #[account(
        mut,
        seeds = [b"proposal", proposal.seed.to_le_bytes().as_ref(), proposal.vote_account.as_ref()],
        bump = proposal.bump
    )]
    pub proposal: Box<Account<'info, Proposal>>,

    #[account(
        mut,
        seeds = [b"vote", proposal.key().as_ref(), vote.validator.as_ref()],
        bump = vote.bump,
        constraint = vote.voting_wallet == signer.key() @ GovernanceError::Unauthorized
    )]
    pub vote: Box<Account<'info, Vote>>,

    #[account(
        mut,
        seeds = [b"vote_override_cache", proposal.key().as_ref(), vote.validator.as_ref()],
        bump = vote_override_cache.bump
    )]
    pub vote_override_cache: Box<Account<'info, VoteOverrideCache>>,

    pub signer: Signer<'info>,
}

pub fn handler(
    ctx: Context<ModifyVote>,
    for_votes_bp: u16,
    against_votes_bp: u16,
    abstain_votes_bp: u16,
) -> Result<()> {
    let split = VoteSplit::new(for_votes_bp, against_votes_bp, abstain_votes_bp)?;
    let clock = Clock::get()?;

    let proposal = &mut ctx.accounts.proposal;
    require_vote_window(proposal, clock.epoch)?;

    let vote = &mut ctx.accounts.vote;
    let cache = &mut ctx.accounts.vote_override_cache;
    apply_modify_vote(proposal, vote, cache, split)?;
    vote.vote_timestamp = clock.unix_timestamp;

    emit!(VoteModified {
        proposal: proposal.key(),
        vote_account: vote.validator,
        voting_wallet: vote.voting_wallet,
        for_votes_bp,
        against_votes_bp,
        abstain_votes_bp,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
