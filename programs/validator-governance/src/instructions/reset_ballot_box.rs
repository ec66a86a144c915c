//! Discard an expired ballot box without a winner (tie-breaker admin only)
//!
//! The box is closed and its rent returned to the payer. `init_ballot_box`
//! can then open a new box for the same slot with the current whitelist and
//! threshold.

use crate::errors::GovernanceError;
use crate::events::BallotBoxReset;
use crate::instructions::ballot_helpers::require_resettable;
use crate::state::{BallotBox, ProgramConfig};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct ResetBallotBox<'info> {
    #[account(
        mut,
        close = payer,
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

    /// CHECK: Rent recipient - validated against ballot_box.payer
    #[account(
        mut,
        constraint = payer.key() == ballot_box.payer @ GovernanceError::Unauthorized
    )]
    pub payer: UncheckedAccount<'info>,

    pub tie_breaker_admin: Signer<'info>,
}

pub fn handler(ctx: Context<ResetBallotBox>) -> Result<()> {
    let ballot_box = &ctx.accounts.ballot_box;
    let clock = Clock::get()?;

    require_resettable(ballot_box, clock.unix_timestamp)?;

    msg!(
        "Ballot box for slot {} discarded by tie-breaker admin",
        ballot_box.snapshot_slot
    );

    emit!(BallotBoxReset {
        ballot_box: ballot_box.key(),
        snapshot_slot: ballot_box.snapshot_slot,
        admin: ctx.accounts.tie_breaker_admin.key(),
        timestamp: clock.unix_timestamp,
    });

    // Account is closed automatically via `close = payer`
    Ok(())
}
