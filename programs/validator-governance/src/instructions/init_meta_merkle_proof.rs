//! Store a validator's meta merkle leaf verified against a consensus result
//!
//! Later vote instructions read the leaf instead of re-verifying the proof.
//! Account space is sized to the submitted proof.

use crate::instructions::proof_helpers::require_close_timestamp;
use crate::state::{ConsensusResult, MetaMerkleLeaf, MetaMerkleProof};
use crate::utils::merkle::require_valid_proof;
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(meta_merkle_leaf: MetaMerkleLeaf, meta_merkle_proof: Vec<[u8; 32]>)]
pub struct InitMetaMerkleProof<'info> {
    #[account(
        seeds = [b"ConsensusResult", consensus_result.snapshot_slot.to_le_bytes().as_ref()],
        bump = consensus_result.bump
    )]
    pub consensus_result: Box<Account<'info, ConsensusResult>>,

    #[account(
        init,
        payer = payer,
        space = MetaMerkleProof::space_for(meta_merkle_proof.len()),
        seeds = [
            b"MetaMerkleProof",
            consensus_result.key().as_ref(),
            meta_merkle_leaf.vote_account.as_ref()
        ],
        bump
    )]
    pub merkle_proof: Box<Account<'info, MetaMerkleProof>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitMetaMerkleProof>,
    meta_merkle_leaf: MetaMerkleLeaf,
    meta_merkle_proof: Vec<[u8; 32]>,
    close_timestamp: i64,
) -> Result<()> {
    let consensus_result = &ctx.accounts.consensus_result;
    let clock = Clock::get()?;

    require_close_timestamp(close_timestamp, clock.unix_timestamp)?;
    require_valid_proof(
        &meta_merkle_proof,
        consensus_result.ballot.meta_merkle_root,
        meta_merkle_leaf.hash(),
    )?;

    let merkle_proof = &mut ctx.accounts.merkle_proof;
    merkle_proof.payer = ctx.accounts.payer.key();
    merkle_proof.consensus_result = consensus_result.key();
    merkle_proof.meta_merkle_leaf = meta_merkle_leaf;
    merkle_proof.meta_merkle_proof = meta_merkle_proof;
    merkle_proof.close_timestamp = close_timestamp;
    merkle_proof.bump = ctx.bumps.merkle_proof;

    Ok(())
}
