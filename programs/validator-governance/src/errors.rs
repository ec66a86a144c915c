//! Error codes for the validator governance program

use anchor_lang::prelude::*;

#[error_code]
pub enum GovernanceError {
    // Validation errors (6000-6099)
    #[msg("Vote distribution must sum to 10000 basis points")]
    InvalidVoteDistribution,

    #[msg("Merkle proof or leaf is malformed")]
    InvalidMerkleInputs,

    #[msg("Merkle proof does not match the expected root")]
    InvalidMerkleProof,

    #[msg("Merkle root has not been set")]
    MerkleRootNotSet,

    #[msg("Ballot must carry a non-zero meta merkle root")]
    InvalidBallot,

    #[msg("Proposal title or description is invalid")]
    InvalidProposalText,

    #[msg("Start epoch cannot be in the past")]
    InvalidStartEpoch,

    #[msg("Voting length is outside the configured bounds")]
    InvalidVotingLength,

    #[msg("Timestamp must be in the future")]
    InvalidTimestamp,

    #[msg("Invalid program configuration parameter")]
    InvalidConfigParam,

    #[msg("Operator key is invalid")]
    InvalidOperator,

    // Proposal lifecycle errors (6100-6199)
    #[msg("Proposal is closed to this action")]
    ProposalClosed,

    #[msg("Proposal has been finalized")]
    ProposalFinalized,

    #[msg("Voting has not started")]
    VotingNotStarted,

    #[msg("Voting period has not ended")]
    VotingPeriodNotEnded,

    #[msg("Proposal timing cannot change once voting has begun")]
    CannotModifyAfterStart,

    #[msg("Consensus result already bound to this proposal")]
    MerkleRootAlreadySet,

    // Ballot box errors (6200-6299)
    #[msg("Ballot box voting has expired")]
    VotingExpired,

    #[msg("Ballot box voting has not expired")]
    VotingNotExpired,

    #[msg("Consensus already reached")]
    ConsensusAlreadyReached,

    #[msg("Consensus not reached")]
    ConsensusNotReached,

    #[msg("Operator has already voted")]
    OperatorAlreadyVoted,

    #[msg("Operator vote not found")]
    OperatorVoteNotFound,

    #[msg("Tie-breaker ballot must be one that operators voted for")]
    TieBreakerNotInPriorVotes,

    // Authorization errors (6300-6399)
    #[msg("Signer is not authorized for this action")]
    Unauthorized,

    #[msg("Operator whitelist update contains overlapping entries")]
    OverlappingWhitelistEntries,

    #[msg("Operator is not whitelisted")]
    OperatorNotWhitelisted,

    #[msg("Validator has no active stake")]
    NotEnoughStake,

    // Capacity errors (6400-6499)
    #[msg("Bounded collection is full")]
    VecFull,

    // Arithmetic errors (6500-6599)
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    #[msg("Overridden stake exceeds the validator's stake")]
    OverrideExceedsStake,

    // Consistency errors (6600-6699)
    #[msg("Proposal does not match this operation")]
    InvalidProposal,

    #[msg("Vote account does not match this operation")]
    InvalidVoteAccount,

    #[msg("Consensus result does not match this proposal")]
    InvalidConsensusResult,
}
