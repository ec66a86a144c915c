//! Create a governance proposal
//!
//! Only a staked validator can propose: the signer must be the node identity
//! of `spl_vote_account`, and that vote account needs non-zero epoch stake.
//! Proposals start in the support phase.

use crate::errors::GovernanceError;
use crate::events::ProposalCreated;
use crate::instructions::proposal_helpers::{initialize_proposal, ProposalParams};
use crate::state::{ProgramConfig, Proposal};
use crate::utils::stake::{
    epoch_stake, require_validator_identity, stake_weight_bps, total_epoch_stake,
};
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(seed: u64)]
pub struct CreateProposal<'info> {
    #[account(
        mut,
        seeds = [b"program_config"],
        bump = program_config.bump
    )]
    pub program_config: Box<Account<'info, ProgramConfig>>,

    #[account(
        init,
        payer = signer,
        space = Proposal::SIZE,
        seeds = [b"proposal", seed.to_le_bytes().as_ref(), spl_vote_account.key().as_ref()],
        bump
    )]
    pub proposal: Box<Account<'info, Proposal>>,

    /// CHECK: Vote program ownership and node identity validated in handler
    pub spl_vote_account: UncheckedAccount<'info>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<CreateProposal>,
    seed: u64,
    title: String,
    description: String,
    start_epoch: u64,
    voting_length_epochs: u64,
) -> Result<()> {
    let vote_account = &ctx.accounts.spl_vote_account;
    let author = ctx.accounts.signer.key();
    let clock = Clock::get()?;

    require_validator_identity(vote_account, &author)?;

    let stake = epoch_stake(vote_account.key);
    require!(stake > 0, GovernanceError::NotEnoughStake);
    let proposer_stake_weight_bps = stake_weight_bps(stake, total_epoch_stake())?;

    let config = &mut ctx.accounts.program_config;
    let index = config.proposal_count;
    let proposal_count = index
        .checked_add(1)
        .ok_or(GovernanceError::ArithmeticOverflow)?;

    let proposal = &mut ctx.accounts.proposal;
    initialize_proposal(
        proposal,
        ProposalParams {
            author,
            vote_account: vote_account.key(),
            seed,
            index,
            title,
            description,
            start_epoch,
            voting_length_epochs,
            max_voting_length_epochs: config.max_voting_length_epochs,
            proposer_stake_weight_bps,
            current_epoch: clock.epoch,
            now: clock.unix_timestamp,
            bump: ctx.bumps.proposal,
        },
    )?;
    config.proposal_count = proposal_count;

    emit!(ProposalCreated {
        proposal: proposal.key(),
        author,
        vote_account: proposal.vote_account,
        index,
        title: proposal.title.clone(),
        description: proposal.description.clone(),
        start_epoch: proposal.start_epoch,
        end_epoch: proposal.end_epoch,
        proposer_stake_weight_bps,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
