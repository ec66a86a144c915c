//! Shared helper functions for stored meta merkle proofs.

use anchor_lang::prelude::*;

use crate::errors::GovernanceError;
use crate::state::MetaMerkleProof;

/// A stored proof must stay open until some point in the future
pub fn require_close_timestamp(close_timestamp: i64, now: i64) -> Result<()> {
    require!(close_timestamp > now, GovernanceError::InvalidTimestamp);
    Ok(())
}

/// Only the payer may close before `close_timestamp`; anyone may from then on
pub fn require_can_close(proof: &MetaMerkleProof, signer: &Pubkey, now: i64) -> Result<()> {
    if now < proof.close_timestamp {
        require_keys_eq!(*signer, proof.payer, GovernanceError::Unauthorized);
    }
    Ok(())
}
