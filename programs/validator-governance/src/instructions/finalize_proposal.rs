//! Finalize a proposal after its last voting epoch
//!
//! Permissionless. The final tally is carried in the emitted event.

use crate::events::ProposalFinalized;
use crate::instructions::proposal_helpers::finalize;
use crate::state::Proposal;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct FinalizeProposal<'info> {
    #[account(
        mut,
        seeds = [b"proposal", proposal.seed.to_le_bytes().as_ref(), proposal.vote_account.as_ref()],
        bump = proposal.bump
    )]
    pub proposal: Box<Account<'info, Proposal>>,
}

pub fn handler(ctx: Context<FinalizeProposal>) -> Result<()> {
    let proposal = &mut ctx.accounts.proposal;
    let clock = Clock::get()?;

    finalize(proposal, clock.epoch)?;

    emit!(ProposalFinalized {
        proposal: proposal.key(),
        for_votes_lamports: proposal.for_votes_lamports,
        against_votes_lamports: proposal.against_votes_lamports,
        abstain_votes_lamports: proposal.abstain_votes_lamports,
        vote_count: proposal.vote_count,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
