//! Add and remove whitelisted operators (authority only)
//!
//! Existing ballot boxes keep the voter list they were created with.

use crate::errors::GovernanceError;
use crate::events::OperatorWhitelistUpdated;
use crate::state::ProgramConfig;
use crate::utils::operators::updated_whitelist;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct UpdateOperatorWhitelist<'info> {
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
    ctx: Context<UpdateOperatorWhitelist>,
    add: Option<Vec<Pubkey>>,
    remove: Option<Vec<Pubkey>>,
) -> Result<()> {
    let config = &mut ctx.accounts.program_config;
    let clock = Clock::get()?;
    let added = add.unwrap_or_default();
    let removed = remove.unwrap_or_default();

    config.whitelisted_operators =
        updated_whitelist(&config.whitelisted_operators, &added, &removed)?;

    emit!(OperatorWhitelistUpdated {
        operator_count: config.whitelisted_operators.len() as u16,
        added,
        removed,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
