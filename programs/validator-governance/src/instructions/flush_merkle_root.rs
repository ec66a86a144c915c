//! Bind the certified snapshot for a proposal's snapshot slot
//!
//! Permissionless and one-shot; votes are rejected until this has run.

use crate::events::MerkleRootFlushed;
use crate::instructions::proposal_helpers::bind_consensus_result;
use crate::state::{ConsensusResult, Proposal};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct FlushMerkleRoot<'info> {
    #[account(
        mut,
        seeds = [b"proposal", proposal.seed.to_le_bytes().as_ref(), proposal.vote_account.as_ref()],
        bump = proposal.bump
    )]
    pub proposal: Box<Account<'info, Proposal>>,

    #[account(
        seeds = [b"ConsensusResult", consensus_result.snapshot_slot.to_le_bytes().as_ref()],
        bump = consensus_result.bump
    )]
    pub consensus_result: Box<Account<'info, ConsensusResult>>,
}

pub fn handler(ctx: Context<FlushMerkleRoot>) -> Result<()> {
    let proposal = &mut ctx.accounts.proposal;
    let consensus_result = &ctx.accounts.consensus_result;
    let clock = Clock::get()?;

    bind_consensus_result(
        proposal,
        consensus_result.key(),
        consensus_result.snapshot_slot,
    )?;

    emit!(MerkleRootFlushed {
        proposal: proposal.key(),
        consensus_result: consensus_result.key(),
        snapshot_slot: consensus_result.snapshot_slot,
        meta_merkle_root: consensus_result.ballot.meta_merkle_root,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
