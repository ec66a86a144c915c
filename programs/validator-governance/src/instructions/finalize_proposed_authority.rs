//! Accept a pending authority transfer

use crate::events::AuthorityTransferred;
use crate::instructions::config_helpers::accept_authority;
use crate::state::ProgramConfig;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct FinalizeProposedAuthority<'info> {
    #[account(
        mut,
        seeds = [b"program_config"],
        bump = program_config.bump
    )]
    pub program_config: Box<Account<'info, ProgramConfig>>,

    pub proposed_authority: Signer<'info>,
}

pub fn handler(ctx: Context<FinalizeProposedAuthority>) -> Result<()> {
    let config = &mut ctx.accounts.program_config;
    let new_authority = ctx.accounts.proposed_authority.key();
    let clock = Clock::get()?;

    let old_authority = accept_authority(config, &new_authority)?;
    msg!("Authority transferred from {} to {}", old_authority, new_authority);

    emit!(AuthorityTransferred {
        old_authority,
        new_authority,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
