//! Open an operator ballot box for a proposal's snapshot slot
//!
//! The box copies the current operator whitelist and consensus threshold.
//! Its account is sized to that voter list, so the list never changes for
//! the lifetime of the box. A reset closes the box and a new one picks up
//! later whitelist edits.

use crate::events::BallotBoxInitialized;
use crate::instructions::ballot_helpers::{
    initialize_ballot_box, require_ballot_box_proposal, BallotBoxParams,
};
use crate::state::{BallotBox, ProgramConfig, Proposal};
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(snapshot_slot: u64, proposal_seed: u64, spl_vote_account: Pubkey)]
pub struct InitBallotBox<'info> {
    #[account(
        seeds = [b"program_config"],
        bump = program_config.bump
    )]
    pub program_config: Box<Account<'info, ProgramConfig>>,

    #[account(
        seeds = [b"proposal", proposal_seed.to_le_bytes().as_ref(), spl_vote_account.as_ref()],
        bump = proposal.bump
    )]
    pub proposal: Box<Account<'info, Proposal>>,

    #[account(
        init,
        payer = payer,
        space = BallotBox::space_for(program_config.whitelisted_operators.len()),
        seeds = [b"BallotBox", snapshot_slot.to_le_bytes().as_ref()],
        bump
    )]
    pub ballot_box: Box<Account<'info, BallotBox>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitBallotBox>,
    snapshot_slot: u64,
    _proposal_seed: u64,
    _spl_vote_account: Pubkey,
) -> Result<()> {
    let config = &ctx.accounts.program_config;
    let proposal = &ctx.accounts.proposal;
    let clock = Clock::get()?;

    require_ballot_box_proposal(proposal, snapshot_slot)?;

    let ballot_box = &mut ctx.accounts.ballot_box;
    initialize_ballot_box(
        ballot_box,
        BallotBoxParams {
            snapshot_slot,
            proposal: proposal.key(),
            payer: ctx.accounts.payer.key(),
            voter_list: config.whitelisted_operators.clone(),
            min_consensus_threshold_bps: config.min_consensus_threshold_bps,
            vote_duration: config.vote_duration,
            current_slot: clock.slot,
            now: clock.unix_timestamp,
            bump: ctx.bumps.ballot_box,
        },
    )?;

    emit!(BallotBoxInitialized {
        ballot_box: ballot_box.key(),
        snapshot_slot,
        proposal: proposal.key(),
        voter_count: ballot_box.voter_list.len() as u16,
        vote_expiry_timestamp: ballot_box.vote_expiry_timestamp,
    });

    Ok(())
}
