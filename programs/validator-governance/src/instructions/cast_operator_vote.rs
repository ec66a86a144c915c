//! Cast an operator vote for a snapshot ballot

use crate::events::{ConsensusReached, OperatorVoteCast};
use crate::instructions::ballot_helpers::record_operator_vote;
use crate::state::{Ballot, BallotBox};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct CastOperatorVote<'info> {
    #[account(
        mut,
        seeds = [b"BallotBox", ballot_box.snapshot_slot.to_le_bytes().as_ref()],
        bump = ballot_box.bump
    )]
    pub ballot_box: Box<Account<'info, BallotBox>>,

    pub operator: Signer<'info>,
}

pub fn handler(ctx: Context<CastOperatorVote>, ballot: Ballot) -> Result<()> {
    let ballot_box = &mut ctx.accounts.ballot_box;
    let operator = ctx.accounts.operator.key();
    let clock = Clock::get()?;

    let reached = record_operator_vote(
        ballot_box,
        &operator,
        &ballot,
        clock.unix_timestamp,
        clock.slot,
    )?;

    let tally = ballot_box
        .operator_votes
        .last()
        .and_then(|vote| ballot_box.ballot_tallies.get(vote.ballot_index as usize))
        .map(|entry| entry.tally)
        .unwrap_or_default();

    emit!(OperatorVoteCast {
        ballot_box: ballot_box.key(),
        operator,
        meta_merkle_root: ballot.meta_merkle_root,
        snapshot_hash: ballot.snapshot_hash,
        tally,
        slot: clock.slot,
    });

    if reached {
        msg!(
            "Consensus reached for snapshot slot {} with {} of {} operators",
            ballot_box.snapshot_slot,
            tally,
            ballot_box.voter_list.len()
        );
        emit!(ConsensusReached {
            ballot_box: ballot_box.key(),
            snapshot_slot: ballot_box.snapshot_slot,
            meta_merkle_root: ballot.meta_merkle_root,
            snapshot_hash: ballot.snapshot_hash,
            tally,
            slot: clock.slot,
        });
    }

    Ok(())
}
