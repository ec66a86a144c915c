//! Change the split of an existing delegator override

use crate::errors::GovernanceError;
use crate::events::VoteOverrideModified;
use crate::instructions::proposal_helpers::require_vote_window;
use crate::instructions::tally_helpers::{apply_modify_override, VoteSplit};
use crate::state::{Proposal, VoteOverride, VoteOverrideCache};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct ModifyVoteOverride<'info> {
    #[account(
        mut,
        seeds = [b"proposal", proposal.seed.to_le_bytes().as_ref(), proposal.vote_account.as_ref()],
        bump = proposal.bump
    )]
    pub proposal: Box<Account<'info, Proposal>>,

    #[account(
        mut,
        seeds = [
            b"vote_override",
            proposal.key().as_ref(),
            vote_override.stake_account.as_ref(),
            vote_override.validator.as_ref()
        ],
        bump = vote_override.bump,
        constraint = vote_override.delegator == signer.key() @ GovernanceError::Unauthorized
    )]
    pub vote_override: Box<Account<'info, VoteOverride>>,

    #[account(
        mut,
        seeds = [b"vote_override_cache", proposal.key().as_ref(), vote_override.validator.as_ref()],
        bump = vote_override_cache.bump
    )]
    pub vote_override_cache: Box<Account<'info, VoteOverrideCache>>,

    pub signer: Signer<'info>,
}

pub fn handler(
    ctx: Context<ModifyVoteOverride>,
    for_votes_bp: u16,
    against_votes_bp: u16,
    abstain_votes_bp: u16,
) -> Result<()> {
    let split = VoteSplit::new(for_votes_bp, against_votes_bp, abstain_votes_bp)?;
    let clock = Clock::get()?;

    let proposal = &mut ctx.accounts.proposal;
    require_vote_window(proposal, clock.epoch)?;

    let vote_override = &mut ctx.accounts.vote_override;
    let cache = &mut ctx.accounts.vote_override_cache;
    apply_modify_override(proposal, cache, vote_override, split)?;
    vote_override.vote_override_timestamp = clock.unix_timestamp;

    emit!(VoteOverrideModified {
        proposal: proposal.key(),
        vote_account: vote_override.validator,
        stake_account: vote_override.stake_account,
        delegator: vote_override.delegator,
        for_votes_bp,
        against_votes_bp,
        abstain_votes_bp,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
