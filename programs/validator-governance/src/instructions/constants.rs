//! Shared constants for instruction handlers

/// Divisor for basis points calculations (100% = 10000 bps)
pub const BASIS_POINTS_DIVISOR: u64 = 10000;

/// Maximum basis point value accepted for any fraction
pub const MAX_BPS: u16 = 10000;

/// Maximum number of whitelisted operators (and ballot box voters)
pub const MAX_OPERATORS: usize = 64;

/// Maximum number of siblings in a merkle proof (trees of up to 2^32 leaves)
pub const MAX_PROOF_DEPTH: usize = 32;

/// Maximum proposal title length in bytes
pub const MAX_TITLE_LENGTH: usize = 50;

/// Maximum proposal description length in bytes
pub const MAX_DESCRIPTION_LENGTH: usize = 250;

// ============================================================================
// Program Config Defaults
// ============================================================================

/// Default share of voter list agreement required for consensus (2/3)
pub const DEFAULT_MIN_CONSENSUS_THRESHOLD_BPS: u16 = 6667;

/// Default ballot box voting window in seconds (1 day)
pub const DEFAULT_VOTE_DURATION: i64 = 24 * 60 * 60;

/// Maximum ballot box voting window in seconds (30 days)
pub const MAX_VOTE_DURATION: i64 = 30 * 24 * 60 * 60;

/// Default share of total active stake needed to open voting (5%)
pub const DEFAULT_SUPPORT_THRESHOLD_BPS: u16 = 500;

/// Default upper bound on a proposal's voting length in epochs
pub const DEFAULT_MAX_VOTING_LENGTH_EPOCHS: u64 = 10;
