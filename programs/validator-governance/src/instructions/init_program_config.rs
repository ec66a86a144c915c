//! Initialize the program configuration
//!
//! Creates the singleton ProgramConfig PDA. The signer becomes both the
//! authority and the tie-breaker admin; consensus and voting parameters start
//! at their defaults and can be changed with `update_program_config`.

use crate::events::ProgramConfigUpdated;
use crate::instructions::constants::{
    DEFAULT_MAX_VOTING_LENGTH_EPOCHS, DEFAULT_MIN_CONSENSUS_THRESHOLD_BPS,
    DEFAULT_SUPPORT_THRESHOLD_BPS, DEFAULT_VOTE_DURATION,
};
use crate::state::ProgramConfig;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct InitProgramConfig<'info> {
    #[account(
        init,
        payer = authority,
        space = ProgramConfig::SIZE,
        seeds = [b"program_config"],
        bump
    )]
    pub program_config: Box<Account<'info, ProgramConfig>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitProgramConfig>) -> Result<()> {
    let config = &mut ctx.accounts.program_config;
    let authority = ctx.accounts.authority.key();
    let clock = Clock::get()?;

    config.authority = authority;
    config.proposed_authority = None;
    config.tie_breaker_admin = authority;
    config.min_consensus_threshold_bps = DEFAULT_MIN_CONSENSUS_THRESHOLD_BPS;
    config.vote_duration = DEFAULT_VOTE_DURATION;
    config.support_threshold_bps = DEFAULT_SUPPORT_THRESHOLD_BPS;
    config.max_voting_length_epochs = DEFAULT_MAX_VOTING_LENGTH_EPOCHS;
    config.proposal_count = 0;
    config.whitelisted_operators = Vec::new();
    config.bump = ctx.bumps.program_config;

    emit!(ProgramConfigUpdated {
        authority,
        proposed_authority: None,
        tie_breaker_admin: authority,
        min_consensus_threshold_bps: config.min_consensus_threshold_bps,
        vote_duration: config.vote_duration,
        support_threshold_bps: config.support_threshold_bps,
        max_voting_length_epochs: config.max_voting_length_epochs,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
