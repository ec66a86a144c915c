//! Select the winning ballot of a stalled ballot box (tie-breaker admin only)

use crate::errors::GovernanceError;
use crate::events::TieBreakerSet;
use crate::instructions::ballot_helpers::set_tie_breaker;
use crate::state::{Ballot, BallotBox, ProgramConfig};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct SetTieBreaker<'info> {
    #[account(
        mut,
        seeds = [b"BallotBox", ballot_box.snapshot_slot.to_le_bytes().as_ref()],
        bump = ballot_box.bump
    )]
    pub ballot_box: Box<Account<'info, BallotBox>>,

    #[account(
        seeds = [b"program_config"],
        bump = program_config.bump,
        has_one = tie_breaker_admin @ GovernanceError::Unauthorized
    )]
    pub program_config: Box<Account<'info, ProgramConfig>>,

    pub tie_breaker_admin: Signer<'info>,
}

pub fn handler(ctx: Context<SetTieBreaker>, ballot: Ballot) -> Result<()> {
    let ballot_box = &mut ctx.accounts.ballot_box;
    let clock = Clock::get()?;

    set_tie_breaker(ballot_box, &ballot, clock.unix_timestamp)?;
    msg!(
        "Tie breaker set for snapshot slot {}",
        ballot_box.snapshot_slot
    );

    emit!(TieBreakerSet {
        ballot_box: ballot_box.key(),
        snapshot_slot: ballot_box.snapshot_slot,
        meta_merkle_root: ballot.meta_merkle_root,
        snapshot_hash: ballot.snapshot_hash,
        admin: ctx.accounts.tie_breaker_admin.key(),
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
