//! Arbitrary input generators for fuzz testing
//!
//! Generates random inputs for the vote tally, ballot box and merkle paths.
//! Most generated values are valid; edge cases are weighted in explicitly.

use proptest::prelude::*;

/// Arbitrary 32-byte value (merkle root, snapshot hash, leaf hash)
pub fn arb_bytes32() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

/// Arbitrary validator stake with edge cases.
///
/// Bounded so that a handful of validators cannot overflow u64 aggregates.
pub fn arb_stake() -> impl Strategy<Value = u64> {
    prop_oneof![
        // Edge cases
        Just(1u64),
        Just(2u64),
        Just(9_999u64),
        Just(10_000u64),
        Just(1_000_000_000_000_000u64),
        // Odd amounts exercise truncation
        1u64..10_000u64,
        // Typical stakes (1 SOL .. 1B SOL)
        1_000_000_000u64..1_000_000_000_000_000_000u64,
    ]
}

/// Basis-point split that always sums to 10000
pub fn arb_vote_split() -> impl Strategy<Value = (u16, u16, u16)> {
    prop_oneof![
        // All-in on one outcome
        Just((10_000u16, 0u16, 0u16)),
        Just((0u16, 10_000u16, 0u16)),
        Just((0u16, 0u16, 10_000u16)),
        Just((3_333u16, 3_333u16, 3_334u16)),
        (0u16..=10_000u16)
            .prop_flat_map(|f| (Just(f), 0u16..=(10_000 - f)))
            .prop_map(|(f, a)| (f, a, 10_000 - f - a)),
    ]
}

/// Basis-point split that may not sum to 10000
pub fn arb_raw_split() -> impl Strategy<Value = (u16, u16, u16)> {
    prop_oneof![
        arb_vote_split(),
        Just((u16::MAX, u16::MAX, 2u16)),
        Just((5_000u16, 5_000u16, 1u16)),
        (any::<u16>(), any::<u16>(), any::<u16>()),
    ]
}

/// Operator whitelist size (1..=64)
pub fn arb_operator_count() -> impl Strategy<Value = usize> {
    prop_oneof![Just(1usize), Just(3usize), Just(10usize), Just(64usize), 1usize..=64usize,]
}

/// Consensus threshold in basis points (1..=10000)
pub fn arb_threshold_bps() -> impl Strategy<Value = u16> {
    prop_oneof![
        Just(1u16),
        Just(5_000u16),
        Just(6_667u16),
        Just(10_000u16),
        1u16..=10_000u16,
    ]
}

// ============================================================================
// Vote tally inputs
// ============================================================================

/// One delegator override against a validator
#[derive(Debug, Clone)]
pub struct OverrideInput {
    /// Share of the validator's stake held by the stake account, in bps.
    /// Shares may add up past 10000 to reach the over-override path.
    pub stake_share_bps: u16,
    pub split: (u16, u16, u16),
    pub modified_split: Option<(u16, u16, u16)>,
}

impl Arbitrary for OverrideInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop_oneof![Just(10_000u16), Just(1u16), 1u16..=6_000u16],
            arb_vote_split(),
            prop::option::of(arb_vote_split()),
        )
            .prop_map(|(stake_share_bps, split, modified_split)| OverrideInput {
                stake_share_bps,
                split,
                modified_split,
            })
            .boxed()
    }
}

/// A validator vote with its delegators' overrides
#[derive(Debug, Clone)]
pub struct VoteTallyInput {
    pub validator_stake: u64,
    pub split: (u16, u16, u16),
    pub modified_split: Option<(u16, u16, u16)>,
    pub overrides: Vec<OverrideInput>,
    /// Validator votes before any override lands
    pub validator_first: bool,
    /// Other validators already counted on the proposal
    pub prior_votes: Vec<(u64, (u16, u16, u16))>,
}

impl Arbitrary for VoteTallyInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_stake(),
            arb_vote_split(),
            prop::option::of(arb_vote_split()),
            prop::collection::vec(any::<OverrideInput>(), 0..6),
            any::<bool>(),
            prop::collection::vec((arb_stake(), arb_vote_split()), 0..4),
        )
            .prop_map(
                |(validator_stake, split, modified_split, overrides, validator_first, prior_votes)| {
                    VoteTallyInput {
                        validator_stake,
                        split,
                        modified_split,
                        overrides,
                        validator_first,
                        prior_votes,
                    }
                },
            )
            .boxed()
    }
}

/// Raw vote arguments, including invalid splits and zero stake
#[derive(Debug, Clone)]
pub struct CastVoteInput {
    pub stake: u64,
    pub split: (u16, u16, u16),
}

impl Arbitrary for CastVoteInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (prop_oneof![Just(0u64), Just(u64::MAX), arb_stake()], arb_raw_split())
            .prop_map(|(stake, split)| CastVoteInput { stake, split })
            .boxed()
    }
}

// ============================================================================
// Ballot box inputs
// ============================================================================

/// Operator action against a ballot box
#[derive(Debug, Clone)]
pub enum BallotOp {
    /// Vote for one of a few candidate ballots (0 = the zero ballot)
    Vote { operator: u8, choice: u8 },
    Remove { operator: u8 },
    /// An address outside the whitelist tries to vote
    Outsider { choice: u8 },
}

fn arb_ballot_op() -> impl Strategy<Value = BallotOp> {
    prop_oneof![
        8 => (any::<u8>(), 0u8..4u8).prop_map(|(operator, choice)| BallotOp::Vote { operator, choice }),
        2 => any::<u8>().prop_map(|operator| BallotOp::Remove { operator }),
        1 => (0u8..4u8).prop_map(|choice| BallotOp::Outsider { choice }),
    ]
}

#[derive(Debug, Clone)]
pub struct BallotBoxInput {
    pub operator_count: usize,
    pub threshold_bps: u16,
    pub ops: Vec<BallotOp>,
    /// Tie-breaker choice once the box expires without consensus
    pub tie_breaker_choice: u8,
}

impl Arbitrary for BallotBoxInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_operator_count(),
            arb_threshold_bps(),
            prop::collection::vec(arb_ballot_op(), 0..96),
            1u8..6u8,
        )
            .prop_map(|(operator_count, threshold_bps, ops, tie_breaker_choice)| BallotBoxInput {
                operator_count,
                threshold_bps,
                ops,
                tie_breaker_choice,
            })
            .boxed()
    }
}

// ============================================================================
// Merkle inputs
// ============================================================================

#[derive(Debug, Clone)]
pub struct MerkleProofInput {
    pub leaves: Vec<[u8; 32]>,
    pub index: prop::sample::Index,
    /// Byte position and xor mask used to tamper with leaf, proof or root
    pub tamper_byte: usize,
    pub tamper_mask: u8,
}

impl Arbitrary for MerkleProofInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::collection::vec(arb_bytes32(), 1..48),
            any::<prop::sample::Index>(),
            0usize..32usize,
            1u8..=255u8,
        )
            .prop_map(|(leaves, index, tamper_byte, tamper_mask)| MerkleProofInput {
                leaves,
                index,
                tamper_byte,
                tamper_mask,
            })
            .boxed()
    }
}
