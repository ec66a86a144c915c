//! Support a proposal with a validator's epoch stake
//!
//! Once supporting stake reaches `support_threshold_bps` of total active
//! stake, the proposal moves to voting and its snapshot slot is fixed.

use crate::events::ProposalSupported;
use crate::instructions::proposal_helpers::record_support;
use crate::state::{ProgramConfig, Proposal, SupportRecord};
use crate::utils::stake::{epoch_stake, require_validator_identity, total_epoch_stake};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct SupportProposal<'info> {
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

    #[account(
        init,
        payer = signer,
        space = SupportRecord::SIZE,
        seeds = [b"support", proposal.key().as_ref(), spl_vote_account.key().as_ref()],
        bump
    )]
    pub support: Account<'info, SupportRecord>,

    /// CHECK: Vote program ownership and node identity validated in handler
    pub spl_vote_account: UncheckedAccount<'info>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<SupportProposal>) -> Result<()> {
    let vote_account = &ctx.accounts.spl_vote_account;
    let supporter = ctx.accounts.signer.key();
    let config = &ctx.accounts.program_config;
    let clock = Clock::get()?;

    require_validator_identity(vote_account, &supporter)?;
    let stake = epoch_stake(vote_account.key);

    let proposal = &mut ctx.accounts.proposal;
    let activated = record_support(
        proposal,
        stake,
        total_epoch_stake(),
        config.support_threshold_bps,
        clock.epoch,
        clock.slot,
    )?;
    if activated {
        msg!(
            "Proposal {} entered voting at snapshot slot {}",
            proposal.key(),
            proposal.snapshot_slot
        );
    }

    let support = &mut ctx.accounts.support;
    support.proposal = proposal.key();
    support.validator = vote_account.key();
    support.supporter = supporter;
    support.stake = stake;
    support.support_timestamp = clock.unix_timestamp;
    support.bump = ctx.bumps.support;

    emit!(ProposalSupported {
        proposal: proposal.key(),
        supporter,
        vote_account: vote_account.key(),
        stake,
        cluster_support_lamports: proposal.cluster_support_lamports,
        voting: proposal.voting,
        snapshot_slot: proposal.snapshot_slot,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
