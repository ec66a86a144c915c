//! Update program configuration (authority only)
//!
//! Every parameter is optional. A new authority is only proposed here and
//! takes effect once it signs `finalize_proposed_authority`.

use crate::errors::GovernanceError;
use crate::events::ProgramConfigUpdated;
use crate::instructions::config_helpers::{apply_config_update, ConfigUpdate};
use crate::state::ProgramConfig;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct UpdateProgramConfig<'info> {
    #[account(
        mut,
        seeds = [b"program_config"],
        bump = program_config.bump,
        has_one = authority @ GovernanceError::Unauthorized
    )]
    pub program_config: Box<Account<'info, ProgramConfig>>,

    pub authority: Signer<'info>,
}

pub fn handler(
    ctx: Context<UpdateProgramConfig>,
    proposed_authority: Option<Pubkey>,
    min_consensus_threshold_bps: Option<u16>,
    tie_breaker_admin: Option<Pubkey>,
    vote_duration: Option<i64>,
    support_threshold_bps: Option<u16>,
    max_voting_length_epochs: Option<u64>,
) -> Result<()> {
    let config = &mut ctx.accounts.program_config;
    let clock = Clock::get()?;

    apply_config_update(
        config,
        &ConfigUpdate {
            proposed_authority,
            min_consensus_threshold_bps,
            tie_breaker_admin,
            vote_duration,
            support_threshold_bps,
            max_voting_length_epochs,
        },
    )?;

    emit!(ProgramConfigUpdated {
        authority: config.authority,
        proposed_authority: config.proposed_authority,
        tie_breaker_admin: config.tie_breaker_admin,
        min_consensus_threshold_bps: config.min_consensus_threshold_bps,
        vote_duration: config.vote_duration,
        support_threshold_bps: config.support_threshold_bps,
        max_voting_length_epochs: config.max_voting_length_epochs,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
