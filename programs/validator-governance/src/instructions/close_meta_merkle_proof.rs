//! Close a stored meta merkle proof and return rent to its payer
//!
//! Only the payer may close before `close_timestamp`; anyone may after.

use crate::errors::GovernanceError;
use crate::instructions::proof_helpers::require_can_close;
use crate::state::MetaMerkleProof;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct CloseMetaMerkleProof<'info> {
    #[account(
        mut,
        close = payer,
        seeds = [
            b"MetaMerkleProof",
            merkle_proof.consensus_result.as_ref(),
            merkle_proof.meta_merkle_leaf.vote_account.as_ref()
        ],
        bump = merkle_proof.bump
    )]
    pub merkle_proof: Box<Account<'info, MetaMerkleProof>>,

    /// CHECK: Rent recipient - validated against merkle_proof.payer
    #[account(
        mut,
        constraint = payer.key() == merkle_proof.payer @ GovernanceError::Unauthorized
    )]
    pub payer: UncheckedAccount<'info>,

    pub signer: Signer<'info>,
}

pub fn handler(ctx: Context<CloseMetaMerkleProof>) -> Result<()> {
    let clock = Clock::get()?;

    require_can_close(
        &ctx.accounts.merkle_proof,
        &ctx.accounts.signer.key(),
        clock.unix_timestamp,
    )?;

    // Account is closed automatically via `close = payer`
    Ok(())
}
