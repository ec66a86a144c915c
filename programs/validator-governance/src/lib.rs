#![allow(unexpected_cfgs)]
//! Validator Governance
//!
//! Stake-weighted on-chain governance for validators. Operators certify the
//! stake snapshot for a proposal through a ballot box; validators and their
//! delegators then vote with stake proven against that snapshot.

use anchor_lang::prelude::*;

declare_id!("4wW2ytwkEkyZH78Ag5UEy5ayW9SHZkDHTYQ4theuatzV");

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
use state::{Ballot, MetaMerkleLeaf, StakeMerkleLeaf};

#[program]
pub mod validator_governance {
    use super::*;

    // ------------------------------------------------------------------------
    // Program configuration
    // ------------------------------------------------------------------------

    /// Create the singleton program config.
    /// The signer becomes authority and tie-breaker admin.
    pub fn init_program_config(ctx: Context<InitProgramConfig>) -> Result<()> {
        instructions::init_program_config::handler(ctx)
    }

    /// Update configuration parameters (authority only).
    /// `None` leaves a parameter unchanged; a new authority is only proposed.
    pub fn update_program_config(
        ctx: Context<UpdateProgramConfig>,
        proposed_authority: Option<Pubkey>,
        min_consensus_threshold_bps: Option<u16>,
        tie_breaker_admin: Option<Pubkey>,
        vote_duration: Option<i64>,
        support_threshold_bps: Option<u16>,
        max_voting_length_epochs: Option<u64>,
    ) -> Result<()> {
        instructions::update_program_config::handler(
            ctx,
            proposed_authority,
            min_consensus_threshold_bps,
            tie_breaker_admin,
            vote_duration,
            support_threshold_bps,
            max_voting_length_epochs,
        )
    }

    /// Accept a proposed authority transfer. Must be signed by the proposed key.
    pub fn finalize_proposed_authority(ctx: Context<FinalizeProposedAuthority>) -> Result<()> {
        instructions::finalize_proposed_authority::handler(ctx)
    }

    /// Add and remove whitelisted operators (authority only).
    pub fn update_operator_whitelist(
        ctx: Context<UpdateOperatorWhitelist>,
        add: Option<Vec<Pubkey>>,
        remove: Option<Vec<Pubkey>>,
    ) -> Result<()> {
        instructions::update_operator_whitelist::handler(ctx, add, remove)
    }

    // ------------------------------------------------------------------------
    // Snapshot consensus
    // ------------------------------------------------------------------------

    /// Open a ballot box for the snapshot slot of a proposal in voting.
    ///
    /// # Arguments
    /// * `snapshot_slot` - Slot of the stake snapshot to certify
    /// * `proposal_seed` - Seed of the proposal that fixed this slot
    /// * `spl_vote_account` - Author vote account of that proposal
    pub fn init_ballot_box(
        ctx: Context<InitBallotBox>,
        snapshot_slot: u64,
        proposal_seed: u64,
        spl_vote_account: Pubkey,
    ) -> Result<()> {
        instructions::init_ballot_box::handler(ctx, snapshot_slot, proposal_seed, spl_vote_account)
    }

    /// Vote for a snapshot ballot as a whitelisted operator.
    pub fn cast_operator_vote(ctx: Context<CastOperatorVote>, ballot: Ballot) -> Result<()> {
        instructions::cast_operator_vote::handler(ctx, ballot)
    }

    /// Withdraw an operator vote while the box is open and unexpired.
    pub fn remove_operator_vote(ctx: Context<RemoveOperatorVote>) -> Result<()> {
        instructions::remove_operator_vote::handler(ctx)
    }

    /// Log the outcome of an expired ballot box.
    pub fn finalize_ballot(ctx: Context<FinalizeBallot>) -> Result<()> {
        instructions::finalize_ballot::handler(ctx)
    }

    /// Choose the winning ballot after expiry without consensus, from the
    /// ballots operators voted for if any (tie-breaker admin only).
    pub fn set_tie_breaker(ctx: Context<SetTieBreaker>, ballot: Ballot) -> Result<()> {
        instructions::set_tie_breaker::handler(ctx, ballot)
    }

    /// Close an expired box without a winner so it can be opened again
    /// (tie-breaker admin only).
    pub fn reset_ballot_box(ctx: Context<ResetBallotBox>) -> Result<()> {
        instructions::reset_ballot_box::handler(ctx)
    }

    /// Record the winning ballot as the certified snapshot for its slot.
    pub fn create_consensus_result(ctx: Context<CreateConsensusResult>) -> Result<()> {
        instructions::create_consensus_result::handler(ctx)
    }

    // ------------------------------------------------------------------------
    // Stake proofs
    // ------------------------------------------------------------------------

    /// Verify and store a validator's meta merkle leaf.
    ///
    /// # Arguments
    /// * `meta_merkle_leaf` - Validator leaf (voting wallet, vote account,
    ///   stake merkle root, active stake)
    /// * `meta_merkle_proof` - Sibling hashes up to the certified root
    /// * `close_timestamp` - Time after which anyone may close the account
    pub fn init_meta_merkle_proof(
        ctx: Context<InitMetaMerkleProof>,
        meta_merkle_leaf: MetaMerkleLeaf,
        meta_merkle_proof: Vec<[u8; 32]>,
        close_timestamp: i64,
    ) -> Result<()> {
        instructions::init_meta_merkle_proof::handler(
            ctx,
            meta_merkle_leaf,
            meta_merkle_proof,
            close_timestamp,
        )
    }

    /// Close a stored proof and refund its payer.
    pub fn close_meta_merkle_proof(ctx: Context<CloseMetaMerkleProof>) -> Result<()> {
        instructions::close_meta_merkle_proof::handler(ctx)
    }

    // ------------------------------------------------------------------------
    // Proposals
    // ------------------------------------------------------------------------

    /// Create a proposal. The signer must be the node identity of a staked
    /// vote account.
    ///
    /// # Arguments
    /// * `seed` - Author-chosen seed for the proposal PDA
    /// * `title` - Short title (max 50 bytes)
    /// * `description` - Reference to the full text (max 250 bytes)
    /// * `start_epoch` - First voting epoch (not in the past)
    /// * `voting_length_epochs` - Number of epochs voting stays open
    pub fn create_proposal(
        ctx: Context<CreateProposal>,
        seed: u64,
        title: String,
        description: String,
        start_epoch: u64,
        voting_length_epochs: u64,
    ) -> Result<()> {
        instructions::create_proposal::handler(
            ctx,
            seed,
            title,
            description,
            start_epoch,
            voting_length_epochs,
        )
    }

    /// Support a proposal with a validator's epoch stake.
    pub fn support_proposal(ctx: Context<SupportProposal>) -> Result<()> {
        instructions::support_proposal::handler(ctx)
    }

    /// Move the voting window before voting opens (author only).
    pub fn adjust_proposal_timing(
        ctx: Context<AdjustProposalTiming>,
        start_epoch: u64,
        voting_length_epochs: u64,
    ) -> Result<()> {
        instructions::adjust_proposal_timing::handler(ctx, start_epoch, voting_length_epochs)
    }

    /// Bind the consensus result for the proposal's snapshot slot.
    pub fn flush_merkle_root(ctx: Context<FlushMerkleRoot>) -> Result<()> {
        instructions::flush_merkle_root::handler(ctx)
    }

    /// Finalize a proposal after its voting window.
    pub fn finalize_proposal(ctx: Context<FinalizeProposal>) -> Result<()> {
        instructions::finalize_proposal::handler(ctx)
    }

    // ------------------------------------------------------------------------
    // Voting
    // ------------------------------------------------------------------------

    /// Cast a validator vote. Basis points must sum to 10000.
    pub fn cast_vote(
        ctx: Context<CastVote>,
        for_votes_bp: u16,
        against_votes_bp: u16,
        abstain_votes_bp: u16,
    ) -> Result<()> {
        instructions::cast_vote::handler(ctx, for_votes_bp, against_votes_bp, abstain_votes_bp)
    }

    /// Change an existing validator vote.
    pub fn modify_vote(
        ctx: Context<ModifyVote>,
        for_votes_bp: u16,
        against_votes_bp: u16,
        abstain_votes_bp: u16,
    ) -> Result<()> {
        instructions::modify_vote::handler(ctx, for_votes_bp, against_votes_bp, abstain_votes_bp)
    }

    /// Override the validator's vote for one delegated stake account.
    ///
    /// # Arguments
    /// * `stake_merkle_proof` - Sibling hashes up to the validator's stake root
    /// * `stake_merkle_leaf` - Delegator leaf (voting wallet, stake account, stake)
    pub fn cast_vote_override(
        ctx: Context<CastVoteOverride>,
        for_votes_bp: u16,
        against_votes_bp: u16,
        abstain_votes_bp: u16,
        stake_merkle_proof: Vec<[u8; 32]>,
        stake_merkle_leaf: StakeMerkleLeaf,
    ) -> Result<()> {
        instructions::cast_vote_override::handler(
            ctx,
            for_votes_bp,
            against_votes_bp,
            abstain_votes_bp,
            stake_merkle_proof,
            stake_merkle_leaf,
        )
    }

    /// Change an existing delegator override.
    pub fn modify_vote_override(
        ctx: Context<ModifyVoteOverride>,
        for_votes_bp: u16,
        against_votes_bp: u16,
        abstain_votes_bp: u16,
    ) -> Result<()> {
        instructions::modify_vote_override::handler(
            ctx,
            for_votes_bp,
            against_votes_bp,
            abstain_votes_bp,
        )
    }
}
