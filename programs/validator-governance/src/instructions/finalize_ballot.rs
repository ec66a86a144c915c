//! Close out voting on an expired ballot box
//!
//! Performs no state change. A box without a winner stays open for the
//! tie-breaker admin.

use crate::instructions::ballot_helpers::{finalize_ballot_box, BallotStatus};
use crate::state::BallotBox;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct FinalizeBallot<'info> {
    #[account(
        seeds = [b"BallotBox", ballot_box.snapshot_slot.to_le_bytes().as_ref()],
        bump = ballot_box.bump
    )]
    pub ballot_box: Box<Account<'info, BallotBox>>,
}

pub fn handler(ctx: Context<FinalizeBallot>) -> Result<()> {
    let ballot_box = &ctx.accounts.ballot_box;
    let clock = Clock::get()?;

    match finalize_ballot_box(ballot_box, clock.unix_timestamp)? {
        BallotStatus::Open => msg!(
            "Snapshot slot {} expired without consensus; awaiting tie breaker",
            ballot_box.snapshot_slot
        ),
        BallotStatus::ConsensusReached => msg!(
            "Snapshot slot {} reached consensus at slot {}",
            ballot_box.snapshot_slot,
            ballot_box.slot_consensus_reached
        ),
        BallotStatus::TieBroken => msg!(
            "Snapshot slot {} resolved by tie breaker",
            ballot_box.snapshot_slot
        ),
    }

    Ok(())
}
