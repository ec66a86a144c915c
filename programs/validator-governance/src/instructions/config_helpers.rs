//! Shared helper functions for program configuration updates.

use crate::errors::GovernanceError;
use crate::instructions::constants::{MAX_BPS, MAX_VOTE_DURATION};
use crate::state::ProgramConfig;
use anchor_lang::prelude::*;

/// Optional field changes; `None` leaves a field as is
#[derive(Clone, Debug, Default)]
pub struct ConfigUpdate {
    pub proposed_authority: Option<Pubkey>,
    pub min_consensus_threshold_bps: Option<u16>,
    pub tie_breaker_admin: Option<Pubkey>,
    pub vote_duration: Option<i64>,
    pub support_threshold_bps: Option<u16>,
    pub max_voting_length_epochs: Option<u64>,
}

fn validate_bps(bps: Option<u16>) -> Result<()> {
    if let Some(bps) = bps {
        require!(
            bps > 0 && bps <= MAX_BPS,
            GovernanceError::InvalidConfigParam
        );
    }
    Ok(())
}

/// Validate every provided field, then apply them all
pub fn apply_config_update(config: &mut ProgramConfig, update: &ConfigUpdate) -> Result<()> {
    validate_bps(update.min_consensus_threshold_bps)?;
    validate_bps(update.support_threshold_bps)?;
    if let Some(duration) = update.vote_duration {
        require!(
            duration > 0 && duration <= MAX_VOTE_DURATION,
            GovernanceError::InvalidConfigParam
        );
    }
    if let Some(length) = update.max_voting_length_epochs {
        require!(length > 0, GovernanceError::InvalidConfigParam);
    }
    for key in [update.proposed_authority, update.tie_breaker_admin]
        .iter()
        .flatten()
    {
        require!(
            *key != Pubkey::default(),
            GovernanceError::InvalidConfigParam
        );
    }

    if let Some(proposed) = update.proposed_authority {
        config.proposed_authority = Some(proposed);
    }
    if let Some(bps) = update.min_consensus_threshold_bps {
        config.min_consensus_threshold_bps = bps;
    }
    if let Some(admin) = update.tie_breaker_admin {
        config.tie_breaker_admin = admin;
    }
    if let Some(duration) = update.vote_duration {
        config.vote_duration = duration;
    }
    if let Some(bps) = update.support_threshold_bps {
        config.support_threshold_bps = bps;
    }
    if let Some(length) = update.max_voting_length_epochs {
        config.max_voting_length_epochs = length;
    }
    Ok(())
}

/// Move the proposed authority into place; only the proposed key may accept
pub fn accept_authority(config: &mut ProgramConfig, signer: &Pubkey) -> Result<Pubkey> {
    let proposed = config
        .proposed_authority
        .ok_or(GovernanceError::Unauthorized)?;
    require_keys_eq!(proposed, *signer, GovernanceError::Unauthorized);

    let old_authority = config.authority;
    config.authority = proposed;
    config.proposed_authority = None;
    Ok(old_authority)
}
