//! Withdraw an operator vote before consensus

use crate::events::OperatorVoteRemoved;
use crate::instructions::ballot_helpers::remove_operator_vote;
use crate::state::BallotBox;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct RemoveOperatorVote<'info> {
    #[account(
        mut,
        seeds = [b"BallotBox", ballot_box.snapshot_slot.to_le_bytes().as_ref()],
        bump = ballot_box.bump
    )]
    pub ballot_box: Box<Account<'info, BallotBox>>,

    pub operator: Signer<'info>,
}

pub fn handler(ctx: Context<RemoveOperatorVote>) -> Result<()> {
    let ballot_box = &mut ctx.accounts.ballot_box;
    let operator = ctx.accounts.operator.key();
    let clock = Clock::get()?;

    remove_operator_vote(ballot_box, &operator, clock.unix_timestamp)?;

    emit!(OperatorVoteRemoved {
        ballot_box: ballot_box.key(),
        operator,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
