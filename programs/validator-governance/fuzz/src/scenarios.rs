//! Scenario simulation for fuzz testing
//!
//! Drives the program's tally, ballot box and merkle helpers over generated
//! inputs and checks the invariants after every step.

use anchor_lang::prelude::Pubkey;
use anchor_lang::error::Error;

use validator_governance::errors::GovernanceError;
use validator_governance::instructions::ballot_helpers::{
    finalize_ballot_box, initialize_ballot_box, record_operator_vote, remove_operator_vote,
    require_resettable, set_tie_breaker, winning_ballot, BallotBoxParams, BallotStatus,
};
use validator_governance::instructions::tally_helpers::{
    apply_cast_override, apply_cast_vote, apply_modify_override, apply_modify_vote, LamportSplit,
    VoteSplit,
};
use validator_governance::state::{
    Ballot, BallotBox, Proposal, Vote, VoteOverride, VoteOverrideCache,
};
use validator_governance::utils::merkle::{
    hash_leaf_fields, require_valid_proof, verify, verify_with_depth, MerkleTree,
};

use crate::arbitrary::{BallotBoxInput, BallotOp, CastVoteInput, MerkleProofInput, VoteTallyInput};
use crate::invariants::*;

pub const NOW: i64 = 1_700_000_000;
pub const VOTE_DURATION: i64 = 86_400;
pub const SNAPSHOT_SLOT: u64 = 250_000_000;

/// Simulation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationResult {
    Success,
    /// Expected rejection of the input
    Error(String),
    InvariantViolation(String),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SimulationResult::Error(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SimulationResult::InvariantViolation(_))
    }
}

fn is_error(err: &Error, expected: GovernanceError) -> bool {
    *err == Error::from(expected)
}

/// Proposal that has passed support and is open for votes
pub fn open_proposal() -> Proposal {
    Proposal {
        author: Pubkey::new_unique(),
        vote_account: Pubkey::new_unique(),
        seed: 1,
        index: 0,
        title: "Fuzz".to_string(),
        description: "https://example.org/proposal".to_string(),
        creation_epoch: 700,
        creation_timestamp: NOW,
        start_epoch: 701,
        end_epoch: 710,
        proposer_stake_weight_bps: 100,
        cluster_support_lamports: 0,
        for_votes_lamports: 0,
        against_votes_lamports: 0,
        abstain_votes_lamports: 0,
        vote_count: 0,
        voting: true,
        finalized: false,
        consensus_result: Some(Pubkey::new_unique()),
        snapshot_slot: SNAPSHOT_SLOT,
        bump: 255,
    }
}

fn split_of((f, a, ab): (u16, u16, u16)) -> Result<VoteSplit, SimulationResult> {
    VoteSplit::new(f, a, ab).map_err(|e| SimulationResult::Error(format!("split rejected: {e}")))
}

// ============================================================================
// Vote Tally Simulation
// ============================================================================

/// Validator state tracked during a tally scenario
#[derive(Default)]
struct TrackedValidator {
    vote: Option<Vote>,
    cache: VoteOverrideCache,
    /// Live override records against this validator
    overrides: Vec<VoteOverride>,
}

fn check_tally(
    proposal: &Proposal,
    validators: &[TrackedValidator],
) -> Result<(), SimulationResult> {
    for validator in validators {
        if let Some(vote) = &validator.vote {
            for result in [
                check_vote_split(vote),
                check_vote_lamports(vote),
                check_override_bound(&validator.cache, vote.stake),
            ] {
                if result != TallyInvariantResult::Valid {
                    return Err(SimulationResult::InvariantViolation(format!("{result:?}")));
                }
            }
        }
        for result in [
            check_netting(validator.vote.as_ref(), &validator.cache),
            check_cache_matches_records(&validator.cache, &validator.overrides),
        ] {
            if result != TallyInvariantResult::Valid {
                return Err(SimulationResult::InvariantViolation(format!("{result:?}")));
            }
        }
    }

    let records: Vec<ValidatorRecords<'_>> = validators
        .iter()
        .map(|v| ValidatorRecords {
            vote: v.vote.as_ref(),
            cache: &v.cache,
            overrides: &v.overrides,
        })
        .collect();
    let identity = check_aggregate_identity(proposal, &LamportSplit::default(), &records);
    if identity != TallyInvariantResult::Valid {
        return Err(SimulationResult::InvariantViolation(format!("{identity:?}")));
    }
    Ok(())
}

fn cast_validator_vote(
    proposal: &mut Proposal,
    validator: &mut TrackedValidator,
    split: VoteSplit,
    stake: u64,
) -> Result<(), SimulationResult> {
    let mut vote = Vote {
        stake,
        ..Default::default()
    };
    apply_cast_vote(proposal, &mut vote, &mut validator.cache, split, stake)
        .map_err(|e| SimulationResult::InvariantViolation(format!("cast_vote failed: {e}")))?;
    validator.vote = Some(vote);
    Ok(())
}

/// Simulate a validator vote, its delegators' overrides and later changes.
///
/// Checks the aggregate identity, netting and the override bound after
/// every step, in either arrival order.
pub fn simulate_vote_tally(input: &VoteTallyInput) -> SimulationResult {
    match run_vote_tally(input) {
        Ok(()) => SimulationResult::Success,
        Err(result) => result,
    }
}

fn run_vote_tally(input: &VoteTallyInput) -> Result<(), SimulationResult> {
    let mut proposal = open_proposal();
    let mut validators = Vec::new();

    for (stake, split) in &input.prior_votes {
        let mut prior = TrackedValidator::default();
        cast_validator_vote(&mut proposal, &mut prior, split_of(*split)?, *stake)?;
        validators.push(prior);
    }
    check_tally(&proposal, &validators)?;

    let target = validators.len();
    validators.push(TrackedValidator::default());
    let validator_split = split_of(input.split)?;

    if input.validator_first {
        cast_validator_vote(
            &mut proposal,
            &mut validators[target],
            validator_split,
            input.validator_stake,
        )?;
        check_tally(&proposal, &validators)?;
    }

    let mut modified_splits = Vec::new();
    for entry in &input.overrides {
        let stake_amount = ((input.validator_stake as u128 * entry.stake_share_bps as u128)
            / 10_000)
            .max(1) as u64;
        let split = split_of(entry.split)?;

        let before_totals = LamportSplit::of_proposal(&proposal);
        let before_cache = validators[target].cache.clone();
        let exceeds = before_cache.total_stake as u128 + stake_amount as u128
            > input.validator_stake as u128;

        let mut vote_override = VoteOverride::default();
        let validator = &mut validators[target];
        let result = apply_cast_override(
            &mut proposal,
            validator.vote.as_mut(),
            &mut validator.cache,
            &mut vote_override,
            split,
            stake_amount,
            input.validator_stake,
        );

        match result {
            Ok(()) if exceeds => {
                return Err(SimulationResult::InvariantViolation(format!(
                    "override of {} accepted past validator stake {}",
                    stake_amount, input.validator_stake
                )))
            }
            Ok(()) => {
                validators[target].overrides.push(vote_override);
                modified_splits.push(entry.modified_split);
            }
            Err(e) => {
                if !exceeds || !is_error(&e, GovernanceError::OverrideExceedsStake) {
                    return Err(SimulationResult::InvariantViolation(format!(
                        "unexpected override error: {e}"
                    )));
                }
                let cache = &validators[target].cache;
                if LamportSplit::of_proposal(&proposal) != before_totals
                    || cache.total_stake != before_cache.total_stake
                    || cache.override_count != before_cache.override_count
                    || LamportSplit::overrides(cache) != LamportSplit::overrides(&before_cache)
                    || LamportSplit::netted(cache) != LamportSplit::netted(&before_cache)
                {
                    return Err(SimulationResult::InvariantViolation(
                        "rejected override left partial writes".to_string(),
                    ));
                }
            }
        }
        check_tally(&proposal, &validators)?;
    }

    if !input.validator_first {
        cast_validator_vote(
            &mut proposal,
            &mut validators[target],
            validator_split,
            input.validator_stake,
        )?;
        check_tally(&proposal, &validators)?;
    }

    if let Some(modified) = input.modified_split {
        let split = split_of(modified)?;
        let validator = &mut validators[target];
        if let Some(vote) = validator.vote.as_mut() {
            apply_modify_vote(&mut proposal, vote, &mut validator.cache, split).map_err(|e| {
                SimulationResult::InvariantViolation(format!("modify_vote failed: {e}"))
            })?;
        }
        check_tally(&proposal, &validators)?;
    }

    for (index, modified) in modified_splits.iter().enumerate() {
        if let Some(modified) = modified {
            let split = split_of(*modified)?;
            let validator = &mut validators[target];
            apply_modify_override(
                &mut proposal,
                &mut validator.cache,
                &mut validator.overrides[index],
                split,
            )
            .map_err(|e| {
                SimulationResult::InvariantViolation(format!("modify_vote_override failed: {e}"))
            })?;
            check_tally(&proposal, &validators)?;
        }
    }

    // Re-applying the current split is a no-op
    let before = LamportSplit::of_proposal(&proposal);
    let validator = &mut validators[target];
    if let Some(vote) = validator.vote.as_mut() {
        let same = VoteSplit::of_vote(vote);
        apply_modify_vote(&mut proposal, vote, &mut validator.cache, same).map_err(|e| {
            SimulationResult::InvariantViolation(format!("idempotent modify failed: {e}"))
        })?;
    }
    if LamportSplit::of_proposal(&proposal) != before {
        return Err(SimulationResult::InvariantViolation(
            "modify with the same split changed the proposal".to_string(),
        ));
    }
    check_tally(&proposal, &validators)
}

/// Simulate cast_vote with unchecked arguments
pub fn simulate_cast_vote(input: &CastVoteInput) -> SimulationResult {
    let (f, a, ab) = input.split;
    let sums_to_total = f as u32 + a as u32 + ab as u32 == 10_000;
    let split = match VoteSplit::new(f, a, ab) {
        Ok(_) if !sums_to_total => {
            return SimulationResult::InvariantViolation(format!(
                "split {:?} accepted",
                input.split
            ))
        }
        Ok(split) => split,
        Err(e) if is_error(&e, GovernanceError::InvalidVoteDistribution) && !sums_to_total => {
            return SimulationResult::Error("InvalidVoteDistribution".to_string())
        }
        Err(e) => return SimulationResult::InvariantViolation(format!("split rejected: {e}")),
    };

    let mut proposal = open_proposal();
    let mut vote = Vote::default();
    let mut cache = VoteOverrideCache::default();
    match apply_cast_vote(&mut proposal, &mut vote, &mut cache, split, input.stake) {
        Ok(()) if input.stake == 0 => {
            SimulationResult::InvariantViolation("vote without stake accepted".to_string())
        }
        Ok(()) => {
            for result in [check_vote_split(&vote), check_vote_lamports(&vote)] {
                if result != TallyInvariantResult::Valid {
                    return SimulationResult::InvariantViolation(format!("{result:?}"));
                }
            }
            if LamportSplit::of_proposal(&proposal) != LamportSplit::of_vote(&vote) {
                return SimulationResult::InvariantViolation(
                    "first vote not reflected in proposal".to_string(),
                );
            }
            SimulationResult::Success
        }
        Err(e) if input.stake == 0 && is_error(&e, GovernanceError::NotEnoughStake) => {
            SimulationResult::Error("NotEnoughStake".to_string())
        }
        Err(e) => SimulationResult::InvariantViolation(format!("cast_vote failed: {e}")),
    }
}

// ============================================================================
// Ballot Box Simulation
// ============================================================================

pub fn operator_key(index: usize) -> Pubkey {
    let mut bytes = [7u8; 32];
    bytes[0] = index as u8;
    Pubkey::new_from_array(bytes)
}

/// Candidate ballot for a choice; choice 0 is the invalid zero ballot
pub fn candidate_ballot(choice: u8) -> Ballot {
    if choice == 0 {
        return Ballot::default();
    }
    Ballot::new([choice; 32], [choice.wrapping_add(100); 32])
}

pub fn new_ballot_box(operator_count: usize, threshold_bps: u16) -> Result<BallotBox, SimulationResult> {
    let mut ballot_box = BallotBox {
        snapshot_slot: 0,
        proposal: Pubkey::default(),
        payer: Pubkey::default(),
        slot_created: 0,
        slot_consensus_reached: 0,
        min_consensus_threshold_bps: 0,
        vote_expiry_timestamp: 0,
        winning_ballot: Ballot::default(),
        tie_breaker_consensus: false,
        voter_list: Vec::new(),
        ballot_tallies: Vec::new(),
        operator_votes: Vec::new(),
        bump: 0,
    };
    initialize_ballot_box(
        &mut ballot_box,
        BallotBoxParams {
            snapshot_slot: SNAPSHOT_SLOT,
            proposal: Pubkey::new_unique(),
            payer: Pubkey::new_unique(),
            voter_list: (0..operator_count).map(operator_key).collect(),
            min_consensus_threshold_bps: threshold_bps,
            vote_duration: VOTE_DURATION,
            current_slot: SNAPSHOT_SLOT + 10,
            now: NOW,
            bump: 254,
        },
    )
    .map_err(|e| SimulationResult::Error(format!("init_ballot_box rejected: {e}")))?;
    Ok(ballot_box)
}

fn check_ballot(before: &BallotBox, after: &BallotBox) -> Result<(), SimulationResult> {
    for result in [
        check_ballot_box_consistency(after),
        check_winner_meets_threshold(after),
        check_winner_stable(before, after),
    ] {
        if result != BallotInvariantResult::Valid {
            return Err(SimulationResult::InvariantViolation(format!("{result:?}")));
        }
    }
    Ok(())
}

/// Simulate operator voting, removals and the tie-breaker path.
pub fn simulate_ballot_box(input: &BallotBoxInput) -> SimulationResult {
    match run_ballot_box(input) {
        Ok(()) => SimulationResult::Success,
        Err(result) => result,
    }
}

fn run_ballot_box(input: &BallotBoxInput) -> Result<(), SimulationResult> {
    let count = input.operator_count.max(1);
    let mut ballot_box = new_ballot_box(count, input.threshold_bps)?;
    let outsider = Pubkey::new_from_array([0xEE; 32]);
    let mut slot = SNAPSHOT_SLOT + 20;

    for op in &input.ops {
        let before = ballot_box.clone();
        let result = match op {
            BallotOp::Vote { operator, choice } => record_operator_vote(
                &mut ballot_box,
                &operator_key(*operator as usize % count),
                &candidate_ballot(*choice),
                NOW,
                slot,
            ),
            BallotOp::Remove { operator } => remove_operator_vote(
                &mut ballot_box,
                &operator_key(*operator as usize % count),
                NOW,
            )
            .map(|_| false),
            BallotOp::Outsider { choice } => {
                let result = record_operator_vote(
                    &mut ballot_box,
                    &outsider,
                    &candidate_ballot(*choice),
                    NOW,
                    slot,
                );
                match &result {
                    Err(e) if is_error(e, GovernanceError::Unauthorized) => {}
                    _ => {
                        return Err(SimulationResult::InvariantViolation(
                            "non-whitelisted operator was not rejected".to_string(),
                        ))
                    }
                }
                result
            }
        };

        match result {
            Ok(reached) => {
                if before.has_winning_ballot() {
                    return Err(SimulationResult::InvariantViolation(
                        "ballot box changed after consensus".to_string(),
                    ));
                }
                if let BallotOp::Vote { choice: 0, .. } = op {
                    return Err(SimulationResult::InvariantViolation(
                        "zero ballot accepted".to_string(),
                    ));
                }
                if reached != ballot_box.has_winning_ballot() {
                    return Err(SimulationResult::InvariantViolation(
                        "consensus flag disagrees with winning ballot".to_string(),
                    ));
                }
            }
            Err(_) => {
                if before.ballot_tallies != ballot_box.ballot_tallies
                    || before.operator_votes != ballot_box.operator_votes
                    || before.winning_ballot != ballot_box.winning_ballot
                {
                    return Err(SimulationResult::InvariantViolation(
                        "rejected operator action left partial writes".to_string(),
                    ));
                }
            }
        }
        check_ballot(&before, &ballot_box)?;
        slot += 1;
    }

    let expiry = ballot_box.vote_expiry_timestamp;
    let requested = candidate_ballot(input.tie_breaker_choice);
    let mut tie_breaker = requested;

    if ballot_box.is_open() {
        match require_resettable(&ballot_box, expiry - 1) {
            Err(e) if is_error(&e, GovernanceError::VotingNotExpired) => {}
            _ => {
                return Err(SimulationResult::InvariantViolation(
                    "reset accepted before expiry".to_string(),
                ))
            }
        }
        require_resettable(&ballot_box, expiry).map_err(|e| {
            SimulationResult::InvariantViolation(format!("reset after expiry failed: {e}"))
        })?;

        match set_tie_breaker(&mut ballot_box, &tie_breaker, expiry - 1) {
            Err(e) if is_error(&e, GovernanceError::VotingNotExpired) => {}
            _ => {
                return Err(SimulationResult::InvariantViolation(
                    "tie-breaker accepted before expiry".to_string(),
                ))
            }
        }
        match finalize_ballot_box(&ballot_box, expiry) {
            Ok(BallotStatus::Open) => {}
            other => {
                return Err(SimulationResult::InvariantViolation(format!(
                    "expired open box finalized as {other:?}"
                )))
            }
        }

        // Operators' ballots bound the tie-breaker once any of them is live
        let live: Vec<Ballot> = ballot_box
            .ballot_tallies
            .iter()
            .filter(|t| t.tally > 0)
            .map(|t| t.ballot)
            .collect();
        if !live.is_empty() && !live.contains(&requested) {
            let before = ballot_box.clone();
            match set_tie_breaker(&mut ballot_box, &requested, expiry) {
                Err(e) if is_error(&e, GovernanceError::TieBreakerNotInPriorVotes) => {}
                _ => {
                    return Err(SimulationResult::InvariantViolation(
                        "tie-breaker accepted a ballot nobody voted for".to_string(),
                    ))
                }
            }
            check_ballot(&before, &ballot_box)?;
            tie_breaker = live[input.tie_breaker_choice as usize % live.len()];
        }

        let before = ballot_box.clone();
        set_tie_breaker(&mut ballot_box, &tie_breaker, expiry).map_err(|e| {
            SimulationResult::InvariantViolation(format!("tie-breaker after expiry failed: {e}"))
        })?;
        check_ballot(&before, &ballot_box)?;
        match winning_ballot(&ballot_box) {
            Ok((ballot, true)) if ballot == tie_breaker && !ballot_box.is_consensus_reached() => {}
            other => {
                return Err(SimulationResult::InvariantViolation(format!(
                    "tie-breaker winner reported as {other:?}"
                )))
            }
        }
    } else {
        match winning_ballot(&ballot_box) {
            Ok((ballot, false)) if ballot == ballot_box.winning_ballot => {}
            other => {
                return Err(SimulationResult::InvariantViolation(format!(
                    "quorum winner reported as {other:?}"
                )))
            }
        }
    }

    // A decided box accepts neither a tie-breaker, a reset nor more votes
    let before = ballot_box.clone();
    let late_vote = record_operator_vote(
        &mut ballot_box,
        &operator_key(0),
        &tie_breaker,
        NOW,
        slot,
    );
    let late_tie_breaker = set_tie_breaker(&mut ballot_box, &tie_breaker, expiry);
    let late_reset = require_resettable(&ballot_box, expiry);
    if late_vote.is_ok() || late_tie_breaker.is_ok() || late_reset.is_ok() {
        return Err(SimulationResult::InvariantViolation(
            "decided ballot box accepted a change".to_string(),
        ));
    }
    check_ballot(&before, &ballot_box)
}

// ============================================================================
// Merkle Proof Simulation
// ============================================================================

/// Build a tree over generated leaves and attack one leaf's proof.
pub fn simulate_merkle_proof(input: &MerkleProofInput) -> SimulationResult {
    let leaves: Vec<[u8; 32]> = input
        .leaves
        .iter()
        .map(|raw| hash_leaf_fields(&[&raw[..]]))
        .collect();
    let Some(tree) = MerkleTree::new(&leaves) else {
        return SimulationResult::Error("empty tree".to_string());
    };
    let index = input.index.index(leaves.len());
    let Some(proof) = tree.proof(index) else {
        return SimulationResult::InvariantViolation(format!("no proof for leaf {index}"));
    };
    let root = tree.root();
    let leaf = leaves[index];
    let depth = tree.depth();

    let results = [
        if verify(&proof, root, leaf)
            && verify_with_depth(&proof, root, leaf, depth)
            && require_valid_proof(&proof, root, leaf).is_ok()
        {
            MerkleInvariantResult::Valid
        } else {
            MerkleInvariantResult::HonestProofRejected { index }
        },
        {
            let mut tampered = leaf;
            tampered[input.tamper_byte] ^= input.tamper_mask;
            if verify(&proof, root, tampered) {
                MerkleInvariantResult::TamperedLeafAccepted { index }
            } else {
                MerkleInvariantResult::Valid
            }
        },
        {
            let mut tampered = root;
            tampered[input.tamper_byte] ^= input.tamper_mask;
            if verify(&proof, tampered, leaf) {
                MerkleInvariantResult::TamperedRootAccepted { index }
            } else {
                MerkleInvariantResult::Valid
            }
        },
        if proof.is_empty() {
            MerkleInvariantResult::Valid
        } else {
            let sibling = input.tamper_byte % proof.len();
            let mut tampered = proof.clone();
            tampered[sibling][input.tamper_byte] ^= input.tamper_mask;
            if verify(&tampered, root, leaf) {
                MerkleInvariantResult::TamperedProofAccepted { index, sibling }
            } else {
                MerkleInvariantResult::Valid
            }
        },
        if verify_with_depth(&proof, root, leaf, depth + 1) {
            MerkleInvariantResult::WrongDepthAccepted { index, depth }
        } else {
            MerkleInvariantResult::Valid
        },
    ];

    for result in results {
        if result != MerkleInvariantResult::Valid {
            return SimulationResult::InvariantViolation(format!("{result:?}"));
        }
    }
    SimulationResult::Success
}
