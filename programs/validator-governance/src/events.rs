//! Events emitted by the validator governance program
//!
//! Indexers rebuild proposal and ballot history from these events; account
//! state only holds the latest values.

use anchor_lang::prelude::*;

// ============================================================================
// Program Configuration Events
// ============================================================================

/// Emitted when the program config is created or changed
#[event]
pub struct ProgramConfigUpdated {
    pub authority: Pubkey,
    pub proposed_authority: Option<Pubkey>,
    pub tie_breaker_admin: Pubkey,
    pub min_consensus_threshold_bps: u16,
    pub vote_duration: i64,
    pub support_threshold_bps: u16,
    pub max_voting_length_epochs: u64,
    pub timestamp: i64,
}

/// Emitted when a proposed authority accepts control
#[event]
pub struct AuthorityTransferred {
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OperatorWhitelistUpdated {
    pub added: Vec<Pubkey>,
    pub removed: Vec<Pubkey>,
    pub operator_count: u16,
    pub timestamp: i64,
}

// ============================================================================
// Snapshot Consensus Events
// ============================================================================

#[event]
pub struct BallotBoxInitialized {
    pub ballot_box: Pubkey,
    pub snapshot_slot: u64,
    pub proposal: Pubkey,
    pub voter_count: u16,
    pub vote_expiry_timestamp: i64,
}

#[event]
pub struct OperatorVoteCast {
    pub ballot_box: Pubkey,
    pub operator: Pubkey,
    pub meta_merkle_root: [u8; 32],
    pub snapshot_hash: [u8; 32],
    pub tally: u64,
    pub slot: u64,
}

#[event]
pub struct OperatorVoteRemoved {
    pub ballot_box: Pubkey,
    pub operator: Pubkey,
    pub timestamp: i64,
}

/// Emitted when a ballot reaches the operator threshold
#[event]
pub struct ConsensusReached {
    pub ballot_box: Pubkey,
    pub snapshot_slot: u64,
    pub meta_merkle_root: [u8; 32],
    pub snapshot_hash: [u8; 32],
    pub tally: u64,
    pub slot: u64,
}

#[event]
pub struct TieBreakerSet {
    pub ballot_box: Pubkey,
    pub snapshot_slot: u64,
    pub meta_merkle_root: [u8; 32],
    pub snapshot_hash: [u8; 32],
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct BallotBoxReset {
    pub ballot_box: Pubkey,
    pub snapshot_slot: u64,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct ConsensusResultCreated {
    pub consensus_result: Pubkey,
    pub snapshot_slot: u64,
    pub meta_merkle_root: [u8; 32],
    pub snapshot_hash: [u8; 32],
    pub tie_breaker_consensus: bool,
    pub timestamp: i64,
}

// ============================================================================
// Proposal Events
// ============================================================================

/// Emitted when a validator creates a proposal
#[event]
pub struct ProposalCreated {
    pub proposal: Pubkey,
    pub author: Pubkey,
    pub vote_account: Pubkey,
    pub index: u64,
    pub title: String,
    pub description: String,
    pub start_epoch: u64,
    pub end_epoch: u64,
    pub proposer_stake_weight_bps: u64,
    pub timestamp: i64,
}

#[event]
pub struct ProposalSupported {
    pub proposal: Pubkey,
    pub supporter: Pubkey,
    pub vote_account: Pubkey,
    pub stake: u64,
    pub cluster_support_lamports: u64,
    pub voting: bool,
    pub snapshot_slot: u64,
    pub timestamp: i64,
}

#[event]
pub struct ProposalTimingAdjusted {
    pub proposal: Pubkey,
    pub start_epoch: u64,
    pub end_epoch: u64,
    pub timestamp: i64,
}

#[event]
pub struct MerkleRootFlushed {
    pub proposal: Pubkey,
    pub consensus_result: Pubkey,
    pub snapshot_slot: u64,
    pub meta_merkle_root: [u8; 32],
    pub timestamp: i64,
}

/// Emitted when voting closes; carries the final tally
#[event]
pub struct ProposalFinalized {
    pub proposal: Pubkey,
    pub for_votes_lamports: u64,
    pub against_votes_lamports: u64,
    pub abstain_votes_lamports: u64,
    pub vote_count: u64,
    pub timestamp: i64,
}

// ============================================================================
// Vote Events
// ============================================================================

#[event]
pub struct VoteCast {
    pub proposal: Pubkey,
    pub vote_account: Pubkey,
    pub voting_wallet: Pubkey,
    pub for_votes_bp: u16,
    pub against_votes_bp: u16,
    pub abstain_votes_bp: u16,
    pub stake: u64,
    pub timestamp: i64,
}

#[event]
pub struct VoteModified {
    pub proposal: Pubkey,
    pub vote_account: Pubkey,
    pub voting_wallet: Pubkey,
    pub for_votes_bp: u16,
    pub against_votes_bp: u16,
    pub abstain_votes_bp: u16,
    pub timestamp: i64,
}

#[event]
pub struct VoteOverrideCast {
    pub proposal: Pubkey,
    pub vote_account: Pubkey,
    pub stake_account: Pubkey,
    pub delegator: Pubkey,
    pub for_votes_bp: u16,
    pub against_votes_bp: u16,
    pub abstain_votes_bp: u16,
    pub stake_amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct VoteOverrideModified {
    pub proposal: Pubkey,
    pub vote_account: Pubkey,
    pub stake_account: Pubkey,
    pub delegator: Pubkey,
    pub for_votes_bp: u16,
    pub against_votes_bp: u16,
    pub abstain_votes_bp: u16,
    pub timestamp: i64,
}
