//! Account state structures for the validator governance program

use anchor_lang::prelude::*;

use crate::instructions::constants::{MAX_OPERATORS, MAX_PROOF_DEPTH};
use crate::utils::merkle::{hash_leaf_fields, HASH_SIZE};

// ============================================================================
// Program Configuration
// ============================================================================

/// Program configuration account
/// PDA seeds: ["program_config"]
#[account]
#[derive(InitSpace)]
pub struct ProgramConfig {
    /// Current authority over configuration and the operator whitelist
    pub authority: Pubkey,
    /// Pending authority; must accept via `finalize_proposed_authority`
    pub proposed_authority: Option<Pubkey>,
    /// May resolve stalled ballot boxes after expiry
    pub tie_breaker_admin: Pubkey,
    /// Share of the voter list that must agree on one ballot
    pub min_consensus_threshold_bps: u16,
    /// Seconds a ballot box stays open after creation
    pub vote_duration: i64,
    /// Share of total active stake that moves a proposal into voting
    pub support_threshold_bps: u16,
    /// Upper bound on a proposal's voting length
    pub max_voting_length_epochs: u64,
    /// Total proposals created (monotonic, source of `Proposal::index`)
    pub proposal_count: u64,
    /// Operators allowed to vote on snapshot ballots.
    ///
    /// Ballot boxes copy this list at creation; later edits never affect an
    /// existing box.
    #[max_len(64)]
    pub whitelisted_operators: Vec<Pubkey>,
    /// Bump seed for PDA
    pub bump: u8,
}

impl ProgramConfig {
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        (1 + 32) + // proposed_authority
        32 + // tie_breaker_admin
        2 +  // min_consensus_threshold_bps
        8 +  // vote_duration
        2 +  // support_threshold_bps
        8 +  // max_voting_length_epochs
        8 +  // proposal_count
        (4 + 32 * MAX_OPERATORS) + // whitelisted_operators
        1; // bump
}

// ============================================================================
// Snapshot Consensus
// ============================================================================

/// Candidate snapshot certified by operators
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace,
)]
pub struct Ballot {
    /// Root of the meta merkle tree (one leaf per validator)
    pub meta_merkle_root: [u8; 32],
    /// SHA256 of the off-chain snapshot file
    pub snapshot_hash: [u8; 32],
}

impl Ballot {
    pub const SIZE: usize = HASH_SIZE + HASH_SIZE;

    pub fn new(meta_merkle_root: [u8; 32], snapshot_hash: [u8; 32]) -> Self {
        Self {
            meta_merkle_root,
            snapshot_hash,
        }
    }

    /// A ballot with a zero root cannot be certified
    pub fn is_valid(&self) -> bool {
        self.meta_merkle_root != [0u8; 32]
    }
}

/// Running count of operators backing one ballot
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct BallotTally {
    /// Position of the tally within `ballot_tallies`
    pub index: u16,
    pub ballot: Ballot,
    pub tally: u64,
}

impl BallotTally {
    pub const SIZE: usize = 2 + Ballot::SIZE + 8;
}

/// One operator's current vote
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct OperatorVote {
    pub operator: Pubkey,
    pub slot_voted: u64,
    /// Index into `ballot_tallies`
    pub ballot_index: u16,
}

impl OperatorVote {
    pub const SIZE: usize = 32 + 8 + 2;
}

/// Operator ballot box for one snapshot slot
/// PDA seeds: ["BallotBox", snapshot_slot]
///
/// The vectors are bounded by `voter_list.len()`, which is frozen at creation
/// and determines the account size. A reset closes the box so the next one
/// snapshots the whitelist again.
#[account]
#[derive(InitSpace)]
pub struct BallotBox {
    pub snapshot_slot: u64,
    /// Proposal that authorized creation of this box
    pub proposal: Pubkey,
    /// Receives the rent when the box is discarded
    pub payer: Pubkey,
    pub slot_created: u64,
    /// Slot at which quorum consensus was reached (0 = not reached)
    pub slot_consensus_reached: u64,
    pub min_consensus_threshold_bps: u16,
    pub vote_expiry_timestamp: i64,
    pub winning_ballot: Ballot,
    /// Winner was chosen by the tie-breaker admin rather than by quorum
    pub tie_breaker_consensus: bool,
    #[max_len(64)]
    pub voter_list: Vec<Pubkey>,
    #[max_len(64)]
    pub ballot_tallies: Vec<BallotTally>,
    #[max_len(64)]
    pub operator_votes: Vec<OperatorVote>,
    pub bump: u8,
}

impl BallotBox {
    /// Account size for a box whose voter list has `voters` entries
    pub const fn space_for(voters: usize) -> usize {
        8 + // discriminator
        8 +  // snapshot_slot
        32 + // proposal
        32 + // payer
        8 +  // slot_created
        8 +  // slot_consensus_reached
        2 +  // min_consensus_threshold_bps
        8 +  // vote_expiry_timestamp
        Ballot::SIZE + // winning_ballot
        1 +  // tie_breaker_consensus
        (4 + 32 * voters) + // voter_list
        (4 + BallotTally::SIZE * voters) + // ballot_tallies
        (4 + OperatorVote::SIZE * voters) + // operator_votes
        1 // bump
    }

    pub fn has_winning_ballot(&self) -> bool {
        self.winning_ballot.is_valid()
    }

    pub fn is_consensus_reached(&self) -> bool {
        self.slot_consensus_reached != 0
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.vote_expiry_timestamp
    }

    /// Neither quorum nor tie-breaker has produced a winner
    pub fn is_open(&self) -> bool {
        !self.has_winning_ballot()
    }

    pub fn capacity(&self) -> usize {
        self.voter_list.len()
    }
}

/// Certified snapshot for a slot
/// PDA seeds: ["ConsensusResult", snapshot_slot]
#[account]
#[derive(InitSpace, Debug)]
pub struct ConsensusResult {
    /// Snapshot slot used for the ballot box
    pub snapshot_slot: u64,
    /// Winning ballot copied from the ballot box
    pub ballot: Ballot,
    /// Whether consensus was reached via tie breaker
    pub tie_breaker_consensus: bool,
    pub created_at: i64,
    pub bump: u8,
}

impl ConsensusResult {
    pub const SIZE: usize = 8 + // discriminator
        8 +  // snapshot_slot
        Ballot::SIZE + // ballot
        1 +  // tie_breaker_consensus
        8 +  // created_at
        1; // bump
}

// ============================================================================
// Stake Proofs
// ============================================================================

/// Validator leaf of the meta merkle tree
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace,
)]
pub struct MetaMerkleLeaf {
    /// Wallet allowed to vote on behalf of the validator
    pub voting_wallet: Pubkey,
    pub vote_account: Pubkey,
    /// Root of this validator's stake merkle tree (one leaf per stake account)
    pub stake_merkle_root: [u8; 32],
    /// Active stake delegated to the vote account at the snapshot slot
    pub active_stake: u64,
}

impl MetaMerkleLeaf {
    pub const SIZE: usize = 32 + 32 + HASH_SIZE + 8;

    pub fn hash(&self) -> [u8; 32] {
        hash_leaf_fields(&[
            self.voting_wallet.as_ref(),
            self.vote_account.as_ref(),
            &self.stake_merkle_root,
            &self.active_stake.to_le_bytes(),
        ])
    }
}

/// Delegator leaf of a validator's stake merkle tree
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace,
)]
pub struct StakeMerkleLeaf {
    /// Wallet allowed to override the validator's vote for this stake
    pub voting_wallet: Pubkey,
    pub stake_account: Pubkey,
    pub active_stake: u64,
}

impl StakeMerkleLeaf {
    pub fn hash(&self) -> [u8; 32] {
        hash_leaf_fields(&[
            self.voting_wallet.as_ref(),
            self.stake_account.as_ref(),
            &self.active_stake.to_le_bytes(),
        ])
    }
}

/// Verified meta leaf anchored to a consensus result
/// PDA seeds: ["MetaMerkleProof", consensus_result, vote_account]
#[account]
#[derive(InitSpace)]
pub struct MetaMerkleProof {
    /// Receives the rent on close
    pub payer: Pubkey,
    pub consensus_result: Pubkey,
    pub meta_merkle_leaf: MetaMerkleLeaf,
    #[max_len(32)]
    pub meta_merkle_proof: Vec<[u8; 32]>,
    /// After this time anyone may close the account
    pub close_timestamp: i64,
    pub bump: u8,
}

impl MetaMerkleProof {
    pub const SIZE: usize = Self::space_for(MAX_PROOF_DEPTH);

    /// Account size for a proof with `siblings` hashes
    pub const fn space_for(siblings: usize) -> usize {
        8 + // discriminator
        32 + // payer
        32 + // consensus_result
        MetaMerkleLeaf::SIZE + // meta_merkle_leaf
        (4 + HASH_SIZE * siblings) + // meta_merkle_proof
        8 +  // close_timestamp
        1 // bump
    }
}

// ============================================================================
// Proposals
// ============================================================================

/// Governance proposal account
/// PDA seeds: ["proposal", seed, author_vote_account]
#[account]
#[derive(InitSpace)]
pub struct Proposal {
    /// Validator identity that created the proposal
    pub author: Pubkey,
    /// Author's vote account
    pub vote_account: Pubkey,
    pub seed: u64,
    /// Creation order across all proposals
    pub index: u64,
    #[max_len(50)]
    pub title: String,
    /// Opaque reference to the full proposal text
    #[max_len(250)]
    pub description: String,
    pub creation_epoch: u64,
    pub creation_timestamp: i64,
    pub start_epoch: u64,
    /// Last epoch in which votes are accepted
    pub end_epoch: u64,
    /// Author's share of total active stake at creation
    pub proposer_stake_weight_bps: u64,
    /// Stake of all validators that supported the proposal
    pub cluster_support_lamports: u64,
    pub for_votes_lamports: u64,
    pub against_votes_lamports: u64,
    pub abstain_votes_lamports: u64,
    /// Number of validator votes
    pub vote_count: u64,
    /// Support threshold reached; false -> true exactly once
    pub voting: bool,
    /// No mutation is accepted after this is set
    pub finalized: bool,
    /// Certified snapshot votes are weighed against
    pub consensus_result: Option<Pubkey>,
    /// Stake snapshot slot, fixed when voting opens
    pub snapshot_slot: u64,
    pub bump: u8,
}

impl Proposal {
    pub const SIZE: usize = 8 + // discriminator
        32 + // author
        32 + // vote_account
        8 +  // seed
        8 +  // index
        (4 + 50) + // title
        (4 + 250) + // description
        8 +  // creation_epoch
        8 +  // creation_timestamp
        8 +  // start_epoch
        8 +  // end_epoch
        8 +  // proposer_stake_weight_bps
        8 +  // cluster_support_lamports
        8 +  // for_votes_lamports
        8 +  // against_votes_lamports
        8 +  // abstain_votes_lamports
        8 +  // vote_count
        1 +  // voting
        1 +  // finalized
        (1 + 32) + // consensus_result
        8 +  // snapshot_slot
        1; // bump

    pub fn voting_length_epochs(&self) -> u64 {
        self.end_epoch.saturating_sub(self.start_epoch)
    }
}

/// Marks that a validator supported a proposal
/// PDA seeds: ["support", proposal, vote_account]
#[account]
#[derive(Default, InitSpace)]
pub struct SupportRecord {
    pub proposal: Pubkey,
    /// Supporting vote account
    pub validator: Pubkey,
    /// Validator identity that signed
    pub supporter: Pubkey,
    /// Epoch stake added to `cluster_support_lamports`
    pub stake: u64,
    pub support_timestamp: i64,
    pub bump: u8,
}

impl SupportRecord {
    pub const SIZE: usize = 8 + // discriminator
        32 + // proposal
        32 + // validator
        32 + // supporter
        8 +  // stake
        8 +  // support_timestamp
        1; // bump
}

// ============================================================================
// Votes
// ============================================================================

/// Validator vote record
/// PDA seeds: ["vote", proposal, vote_account]
#[account]
#[derive(Default, InitSpace)]
pub struct Vote {
    pub proposal: Pubkey,
    /// Vote account the stake is delegated to
    pub validator: Pubkey,
    /// Signer allowed to modify this vote
    pub voting_wallet: Pubkey,
    pub for_votes_bp: u16,
    pub against_votes_bp: u16,
    pub abstain_votes_bp: u16,
    /// `stake * bp / 10000` per outcome, before override netting
    pub for_votes_lamports: u64,
    pub against_votes_lamports: u64,
    pub abstain_votes_lamports: u64,
    /// Active stake from the meta merkle leaf
    pub stake: u64,
    /// Stake currently overridden away by delegators
    pub override_lamports: u64,
    pub vote_timestamp: i64,
    pub tie_breaker_consensus: bool,
    pub bump: u8,
}

impl Vote {
    pub const SIZE: usize = 8 + // discriminator
        32 + // proposal
        32 + // validator
        32 + // voting_wallet
        2 +  // for_votes_bp
        2 +  // against_votes_bp
        2 +  // abstain_votes_bp
        8 +  // for_votes_lamports
        8 +  // against_votes_lamports
        8 +  // abstain_votes_lamports
        8 +  // stake
        8 +  // override_lamports
        8 +  // vote_timestamp
        1 +  // tie_breaker_consensus
        1; // bump
}

/// Delegator vote superseding the validator's vote for one stake account
/// PDA seeds: ["vote_override", proposal, stake_account, vote_account]
#[account]
#[derive(Default, InitSpace)]
pub struct VoteOverride {
    pub proposal: Pubkey,
    /// Vote account the stake is delegated to
    pub validator: Pubkey,
    pub stake_account: Pubkey,
    /// Voting wallet from the stake merkle leaf
    pub delegator: Pubkey,
    pub for_votes_bp: u16,
    pub against_votes_bp: u16,
    pub abstain_votes_bp: u16,
    pub for_votes_lamports: u64,
    pub against_votes_lamports: u64,
    pub abstain_votes_lamports: u64,
    pub stake_amount: u64,
    pub vote_override_timestamp: i64,
    pub tie_breaker_consensus: bool,
    pub bump: u8,
}

impl VoteOverride {
    pub const SIZE: usize = 8 + // discriminator
        32 + // proposal
        32 + // validator
        32 + // stake_account
        32 + // delegator
        2 +  // for_votes_bp
        2 +  // against_votes_bp
        2 +  // abstain_votes_bp
        8 +  // for_votes_lamports
        8 +  // against_votes_lamports
        8 +  // abstain_votes_lamports
        8 +  // stake_amount
        8 +  // vote_override_timestamp
        1 +  // tie_breaker_consensus
        1; // bump
}

/// Per-validator aggregate of live overrides
/// PDA seeds: ["vote_override_cache", proposal, vote_account]
///
/// `for/against/abstain_votes_lamports` are the validator lamports netted out
/// for the overridden stake (the validator's split applied to `total_stake`).
/// `override_*` fields sum the overrides' own lamports.
#[account]
#[derive(Default, InitSpace)]
pub struct VoteOverrideCache {
    pub proposal: Pubkey,
    pub validator: Pubkey,
    /// The validator has a `Vote`; overrides must then net against it
    pub validator_voted: bool,
    /// Stake overridden away from the validator
    pub total_stake: u64,
    pub for_votes_lamports: u64,
    pub against_votes_lamports: u64,
    pub abstain_votes_lamports: u64,
    pub override_for_votes_lamports: u64,
    pub override_against_votes_lamports: u64,
    pub override_abstain_votes_lamports: u64,
    pub override_count: u64,
    pub bump: u8,
}

impl VoteOverrideCache {
    pub const SIZE: usize = 8 + // discriminator
        32 + // proposal
        32 + // validator
        1 +  // validator_voted
        8 +  // total_stake
        8 +  // for_votes_lamports
        8 +  // against_votes_lamports
        8 +  // abstain_votes_lamports
        8 +  // override_for_votes_lamports
        8 +  // override_against_votes_lamports
        8 +  // override_abstain_votes_lamports
        8 +  // override_count
        1; // bump
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: SIZE should equal INIT_SPACE (borsh serialized) + 8-byte discriminator.
    macro_rules! test_size_constant {
        ($struct:ty) => {
            assert_eq!(
                <$struct>::SIZE,
                <$struct as anchor_lang::Space>::INIT_SPACE + 8,
                concat!(stringify!($struct), "::SIZE mismatch with INIT_SPACE")
            );
        };
    }

    #[test]
    fn test_program_config_size() {
        test_size_constant!(ProgramConfig);
    }

    #[test]
    fn test_consensus_result_size() {
        test_size_constant!(ConsensusResult);
    }

    #[test]
    fn test_meta_merkle_proof_size() {
        test_size_constant!(MetaMerkleProof);
    }

    #[test]
    fn test_proposal_size() {
        test_size_constant!(Proposal);
    }

    #[test]
    fn test_support_record_size() {
        test_size_constant!(SupportRecord);
    }

    #[test]
    fn test_vote_size() {
        test_size_constant!(Vote);
    }

    #[test]
    fn test_vote_override_size() {
        test_size_constant!(VoteOverride);
    }

    #[test]
    fn test_vote_override_cache_size() {
        test_size_constant!(VoteOverrideCache);
    }

    #[test]
    fn test_nested_type_sizes() {
        assert_eq!(Ballot::SIZE, <Ballot as anchor_lang::Space>::INIT_SPACE);
        assert_eq!(
            BallotTally::SIZE,
            <BallotTally as anchor_lang::Space>::INIT_SPACE
        );
        assert_eq!(
            OperatorVote::SIZE,
            <OperatorVote as anchor_lang::Space>::INIT_SPACE
        );
        assert_eq!(
            MetaMerkleLeaf::SIZE,
            <MetaMerkleLeaf as anchor_lang::Space>::INIT_SPACE
        );
    }

    #[test]
    fn test_ballot_box_space_at_capacity() {
        assert_eq!(
            BallotBox::space_for(MAX_OPERATORS),
            <BallotBox as anchor_lang::Space>::INIT_SPACE + 8
        );
        // Fits the 10 KiB limit for accounts created through CPI
        assert!(BallotBox::space_for(MAX_OPERATORS) <= 10_240);
    }

    #[test]
    fn test_ballot_box_space_grows_per_voter() {
        let per_voter = 32 + BallotTally::SIZE + OperatorVote::SIZE;
        assert_eq!(
            BallotBox::space_for(11) - BallotBox::space_for(10),
            per_voter
        );
    }

    #[test]
    fn test_zero_root_ballot_is_invalid() {
        assert!(!Ballot::default().is_valid());
        assert!(!Ballot::new([0u8; 32], [7u8; 32]).is_valid());
        assert!(Ballot::new([1u8; 32], [0u8; 32]).is_valid());
    }

    #[test]
    fn test_leaf_hash_commits_to_every_field() {
        let leaf = MetaMerkleLeaf {
            voting_wallet: Pubkey::new_unique(),
            vote_account: Pubkey::new_unique(),
            stake_merkle_root: [3u8; 32],
            active_stake: 1_000_000,
        };
        let mut changed = leaf;
        changed.active_stake += 1;
        assert_ne!(leaf.hash(), changed.hash());

        let mut changed = leaf;
        changed.stake_merkle_root[31] ^= 1;
        assert_ne!(leaf.hash(), changed.hash());

        let stake_leaf = StakeMerkleLeaf {
            voting_wallet: leaf.voting_wallet,
            stake_account: Pubkey::new_unique(),
            active_stake: 5,
        };
        let mut changed = stake_leaf;
        changed.voting_wallet = Pubkey::new_unique();
        assert_ne!(stake_leaf.hash(), changed.hash());
    }
}
