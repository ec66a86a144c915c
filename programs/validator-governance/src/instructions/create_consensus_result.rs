//! Record the certified snapshot once a ballot box has a winner
//!
//! Permissionless; the result is immutable after creation.

use crate::events::ConsensusResultCreated;
use crate::instructions::ballot_helpers::winning_ballot;
use crate::state::{BallotBox, ConsensusResult};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct CreateConsensusResult<'info> {
    #[account(
        seeds = [b"BallotBox", ballot_box.snapshot_slot.to_le_bytes().as_ref()],
        bump = ballot_box.bump
    )]
    pub ballot_box: Box<Account<'info, BallotBox>>,

    #[account(
        init,
        payer = payer,
        space = ConsensusResult::SIZE,
        seeds = [b"ConsensusResult", ballot_box.snapshot_slot.to_le_bytes().as_ref()],
        bump
    )]
    pub consensus_result: Box<Account<'info, ConsensusResult>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateConsensusResult>) -> Result<()> {
    let ballot_box = &ctx.accounts.ballot_box;
    let clock = Clock::get()?;

    let (ballot, tie_breaker_consensus) = winning_ballot(ballot_box)?;

    let result = &mut ctx.accounts.consensus_result;
    result.snapshot_slot = ballot_box.snapshot_slot;
    result.ballot = ballot;
    result.tie_breaker_consensus = tie_breaker_consensus;
    result.created_at = clock.unix_timestamp;
    result.bump = ctx.bumps.consensus_result;

    emit!(ConsensusResultCreated {
        consensus_result: result.key(),
        snapshot_slot: result.snapshot_slot,
        meta_merkle_root: ballot.meta_merkle_root,
        snapshot_hash: ballot.snapshot_hash,
        tie_breaker_consensus,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
