//! Move a proposal's voting window (author only, before voting opens)

use crate::events::ProposalTimingAdjusted;
use crate::instructions::proposal_helpers::adjust_timing;
use crate::state::{ProgramConfig, Proposal};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct AdjustProposalTiming<'info> {
    #[account(
        seeds = [b"program_config"],
        bump = program_config.bump
    )]
    pub program_config: Box<Account<'info, ProgramConfig>>,

    #[account(
        mut,
        seeds = [b"proposal", proposal.seed.to_le_bytes().as_ref(), proposal.vote_account.as_ref()],
        bump = proposal.bump
    )]
    pub proposal: Box<Account<'info, Proposal>>,

    pub author: Signer<'info>,
}

pub fn handler(
    ctx: Context<AdjustProposalTiming>,
    start_epoch: u64,
    voting_length_epochs: u64,
) -> Result<()> {
    let config = &ctx.accounts.program_config;
    let proposal = &mut ctx.accounts.proposal;
    let clock = Clock::get()?;

    adjust_timing(
        proposal,
        &ctx.accounts.author.key(),
        start_epoch,
        voting_length_epochs,
        clock.epoch,
        config.max_voting_length_epochs,
    )?;

    emit!(ProposalTimingAdjusted {
        proposal: proposal.key(),
        start_epoch: proposal.start_epoch,
        end_epoch: proposal.end_epoch,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
