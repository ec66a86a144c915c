//! Shared helper functions for operator ballot boxes.
//!
//! Used by the ballot box instructions and by the fuzz harness. Every helper
//! validates before it writes, so a rejected call leaves the box untouched.

use anchor_lang::prelude::*;

use crate::errors::GovernanceError;
use crate::state::{Ballot, BallotBox, BallotTally, OperatorVote, Proposal};
use crate::utils::stake::meets_threshold;

/// Outcome of a ballot box
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallotStatus {
    Open,
    ConsensusReached,
    TieBroken,
}

pub fn ballot_status(ballot_box: &BallotBox) -> BallotStatus {
    if !ballot_box.has_winning_ballot() {
        BallotStatus::Open
    } else if ballot_box.tie_breaker_consensus {
        BallotStatus::TieBroken
    } else {
        BallotStatus::ConsensusReached
    }
}

/// Parameters frozen into a ballot box at creation
pub struct BallotBoxParams {
    pub snapshot_slot: u64,
    pub proposal: Pubkey,
    pub payer: Pubkey,
    pub voter_list: Vec<Pubkey>,
    pub min_consensus_threshold_bps: u16,
    pub vote_duration: i64,
    pub current_slot: u64,
    pub now: i64,
    pub bump: u8,
}

/// A ballot box may only be opened for a proposal that is voting on the
/// same snapshot slot
pub fn require_ballot_box_proposal(proposal: &Proposal, snapshot_slot: u64) -> Result<()> {
    require!(
        proposal.voting && !proposal.finalized,
        GovernanceError::InvalidProposal
    );
    require!(
        proposal.snapshot_slot == snapshot_slot,
        GovernanceError::InvalidProposal
    );
    Ok(())
}

pub fn initialize_ballot_box(ballot_box: &mut BallotBox, params: BallotBoxParams) -> Result<()> {
    require!(
        !params.voter_list.is_empty(),
        GovernanceError::OperatorNotWhitelisted
    );
    let vote_expiry_timestamp = params
        .now
        .checked_add(params.vote_duration)
        .ok_or(GovernanceError::ArithmeticOverflow)?;

    ballot_box.snapshot_slot = params.snapshot_slot;
    ballot_box.proposal = params.proposal;
    ballot_box.payer = params.payer;
    ballot_box.slot_created = params.current_slot;
    ballot_box.slot_consensus_reached = 0;
    ballot_box.min_consensus_threshold_bps = params.min_consensus_threshold_bps;
    ballot_box.vote_expiry_timestamp = vote_expiry_timestamp;
    ballot_box.winning_ballot = Ballot::default();
    ballot_box.tie_breaker_consensus = false;
    ballot_box.voter_list = params.voter_list;
    ballot_box.ballot_tallies = Vec::new();
    ballot_box.operator_votes = Vec::new();
    ballot_box.bump = params.bump;
    Ok(())
}

/// Index of the tally `ballot` would land in, and whether it is a new entry
fn find_tally_slot(ballot_box: &BallotBox, ballot: &Ballot) -> Result<(usize, bool)> {
    if let Some(index) = ballot_box
        .ballot_tallies
        .iter()
        .position(|t| t.tally > 0 && t.ballot == *ballot)
    {
        return Ok((index, false));
    }
    if let Some(index) = ballot_box.ballot_tallies.iter().position(|t| t.tally == 0) {
        return Ok((index, true));
    }
    require!(
        ballot_box.ballot_tallies.len() < ballot_box.capacity(),
        GovernanceError::VecFull
    );
    Ok((ballot_box.ballot_tallies.len(), true))
}

/// Record an operator's ballot and check for consensus.
///
/// Returns true when this vote produced the winning ballot.
pub fn record_operator_vote(
    ballot_box: &mut BallotBox,
    operator: &Pubkey,
    ballot: &Ballot,
    now: i64,
    current_slot: u64,
) -> Result<bool> {
    require!(
        ballot_box.voter_list.contains(operator),
        GovernanceError::Unauthorized
    );
    require!(!ballot_box.is_expired(now), GovernanceError::VotingExpired);
    require!(
        ballot_box.is_open(),
        GovernanceError::ConsensusAlreadyReached
    );
    require!(
        !ballot_box
            .operator_votes
            .iter()
            .any(|v| v.operator == *operator),
        GovernanceError::OperatorAlreadyVoted
    );
    require!(ballot.is_valid(), GovernanceError::InvalidBallot);
    require!(
        ballot_box.operator_votes.len() < ballot_box.capacity(),
        GovernanceError::VecFull
    );

    let (index, is_new) = find_tally_slot(ballot_box, ballot)?;
    let ballot_index = u16::try_from(index).map_err(|_| error!(GovernanceError::VecFull))?;
    let tally = if is_new {
        1
    } else {
        ballot_box.ballot_tallies[index]
            .tally
            .checked_add(1)
            .ok_or(GovernanceError::ArithmeticOverflow)?
    };

    let entry = BallotTally {
        index: ballot_index,
        ballot: *ballot,
        tally,
    };
    if index == ballot_box.ballot_tallies.len() {
        ballot_box.ballot_tallies.push(entry);
    } else {
        ballot_box.ballot_tallies[index] = entry;
    }
    ballot_box.operator_votes.push(OperatorVote {
        operator: *operator,
        slot_voted: current_slot,
        ballot_index,
    });

    let voters = ballot_box.voter_list.len() as u64;
    if meets_threshold(tally, voters, ballot_box.min_consensus_threshold_bps) {
        ballot_box.winning_ballot = *ballot;
        ballot_box.slot_consensus_reached = current_slot;
        return Ok(true);
    }
    Ok(false)
}

/// Withdraw an operator's vote while the box is still open
pub fn remove_operator_vote(ballot_box: &mut BallotBox, operator: &Pubkey, now: i64) -> Result<()> {
    require!(
        ballot_box.is_open(),
        GovernanceError::ConsensusAlreadyReached
    );
    require!(!ballot_box.is_expired(now), GovernanceError::VotingExpired);

    let position = ballot_box
        .operator_votes
        .iter()
        .position(|v| v.operator == *operator)
        .ok_or(GovernanceError::OperatorVoteNotFound)?;
    let ballot_index = ballot_box.operator_votes[position].ballot_index as usize;
    let tally = ballot_box
        .ballot_tallies
        .get(ballot_index)
        .ok_or(GovernanceError::OperatorVoteNotFound)?
        .tally
        .checked_sub(1)
        .ok_or(GovernanceError::ArithmeticOverflow)?;

    ballot_box.ballot_tallies[ballot_index].tally = tally;
    ballot_box.operator_votes.remove(position);
    Ok(())
}

/// Administrative selection of the winning ballot after a stalled vote.
///
/// When operators backed any ballot, the choice is limited to those ballots.
pub fn set_tie_breaker(ballot_box: &mut BallotBox, ballot: &Ballot, now: i64) -> Result<()> {
    require!(ballot.is_valid(), GovernanceError::InvalidBallot);
    require!(
        ballot_box.is_expired(now),
        GovernanceError::VotingNotExpired
    );
    require!(
        ballot_box.is_open(),
        GovernanceError::ConsensusAlreadyReached
    );

    let mut live = ballot_box.ballot_tallies.iter().filter(|t| t.tally > 0).peekable();
    if live.peek().is_some() {
        require!(
            live.any(|t| t.ballot == *ballot),
            GovernanceError::TieBreakerNotInPriorVotes
        );
    }

    ballot_box.winning_ballot = *ballot;
    ballot_box.tie_breaker_consensus = true;
    Ok(())
}

/// An expired box without a winner may be discarded and opened again
pub fn require_resettable(ballot_box: &BallotBox, now: i64) -> Result<()> {
    require!(
        ballot_box.is_open(),
        GovernanceError::ConsensusAlreadyReached
    );
    require!(
        ballot_box.is_expired(now),
        GovernanceError::VotingNotExpired
    );
    Ok(())
}

/// Check that a box may be finalized and report its outcome
pub fn finalize_ballot_box(ballot_box: &BallotBox, now: i64) -> Result<BallotStatus> {
    require!(
        ballot_box.is_expired(now),
        GovernanceError::VotingNotExpired
    );
    Ok(ballot_status(ballot_box))
}

/// Winning ballot and tie-breaker flag for a consensus result
pub fn winning_ballot(ballot_box: &BallotBox) -> Result<(Ballot, bool)> {
    require!(
        ballot_box.has_winning_ballot(),
        GovernanceError::ConsensusNotReached
    );
    Ok((ballot_box.winning_ballot, ballot_box.tie_breaker_consensus))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const DURATION: i64 = 86_400;

    fn ballot(byte: u8) -> Ballot {
        Ballot::new([byte; 32], [byte.wrapping_add(100); 32])
    }

    fn operators(count: usize) -> Vec<Pubkey> {
        (0..count).map(|_| Pubkey::new_unique()).collect()
    }

    fn new_box(voters: &[Pubkey], threshold_bps: u16) -> BallotBox {
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
                snapshot_slot: 1_000,
                proposal: Pubkey::new_unique(),
                payer: Pubkey::new_unique(),
                voter_list: voters.to_vec(),
                min_consensus_threshold_bps: threshold_bps,
                vote_duration: DURATION,
                current_slot: 1_010,
                now: NOW,
                bump: 255,
            },
        )
        .unwrap();
        ballot_box
    }

    #[test]
    fn test_initialize_requires_voters() {
        let mut ballot_box = new_box(&operators(1), 6667);
        let err = initialize_ballot_box(
            &mut ballot_box,
            BallotBoxParams {
                snapshot_slot: 1,
                proposal: Pubkey::new_unique(),
                payer: Pubkey::new_unique(),
                voter_list: Vec::new(),
                min_consensus_threshold_bps: 6667,
                vote_duration: DURATION,
                current_slot: 1,
                now: NOW,
                bump: 1,
            },
        )
        .unwrap_err();
        assert_eq!(err, GovernanceError::OperatorNotWhitelisted.into());
    }

    #[test]
    fn test_initialize_sets_expiry() {
        let ballot_box = new_box(&operators(3), 6667);
        assert_eq!(ballot_box.vote_expiry_timestamp, NOW + DURATION);
        assert_eq!(ballot_box.slot_created, 1_010);
        assert_eq!(ballot_status(&ballot_box), BallotStatus::Open);
    }

    #[test]
    fn test_consensus_on_seventh_of_ten() {
        let voters = operators(10);
        let mut ballot_box = new_box(&voters, 6667);
        let winner = ballot(1);

        for (i, operator) in voters.iter().take(6).enumerate() {
            let reached =
                record_operator_vote(&mut ballot_box, operator, &winner, NOW, 2_000 + i as u64)
                    .unwrap();
            assert!(!reached);
        }
        assert_eq!(ballot_status(&ballot_box), BallotStatus::Open);

        let reached = record_operator_vote(&mut ballot_box, &voters[6], &winner, NOW, 2_006).unwrap();
        assert!(reached);
        assert_eq!(ballot_box.winning_ballot, winner);
        assert_eq!(ballot_box.slot_consensus_reached, 2_006);
        assert_eq!(ballot_box.ballot_tallies[0].tally, 7);
        assert_eq!(ballot_status(&ballot_box), BallotStatus::ConsensusReached);

        // Winner is frozen
        let err = record_operator_vote(&mut ballot_box, &voters[7], &ballot(2), NOW, 2_007)
            .unwrap_err();
        assert_eq!(err, GovernanceError::ConsensusAlreadyReached.into());
        let err = remove_operator_vote(&mut ballot_box, &voters[0], NOW).unwrap_err();
        assert_eq!(err, GovernanceError::ConsensusAlreadyReached.into());
        assert_eq!(ballot_box.winning_ballot, winner);
    }

    #[test]
    fn test_split_votes_tally_separately() {
        let voters = operators(4);
        let mut ballot_box = new_box(&voters, 6667);
        record_operator_vote(&mut ballot_box, &voters[0], &ballot(1), NOW, 1).unwrap();
        record_operator_vote(&mut ballot_box, &voters[1], &ballot(2), NOW, 1).unwrap();
        record_operator_vote(&mut ballot_box, &voters[2], &ballot(1), NOW, 1).unwrap();

        assert_eq!(ballot_box.ballot_tallies.len(), 2);
        assert_eq!(ballot_box.ballot_tallies[0].tally, 2);
        assert_eq!(ballot_box.ballot_tallies[1].tally, 1);
        assert_eq!(ballot_box.operator_votes[1].ballot_index, 1);
        assert!(ballot_box.is_open());
    }

    #[test]
    fn test_cast_vote_rejections() {
        let voters = operators(3);
        let mut ballot_box = new_box(&voters, 6667);

        let err = record_operator_vote(&mut ballot_box, &Pubkey::new_unique(), &ballot(1), NOW, 1)
            .unwrap_err();
        assert_eq!(err, GovernanceError::Unauthorized.into());

        let err = record_operator_vote(&mut ballot_box, &voters[0], &Ballot::default(), NOW, 1)
            .unwrap_err();
        assert_eq!(err, GovernanceError::InvalidBallot.into());

        let err = record_operator_vote(&mut ballot_box, &voters[0], &ballot(1), NOW + DURATION, 1)
            .unwrap_err();
        assert_eq!(err, GovernanceError::VotingExpired.into());

        record_operator_vote(&mut ballot_box, &voters[0], &ballot(1), NOW, 1).unwrap();
        let err = record_operator_vote(&mut ballot_box, &voters[0], &ballot(2), NOW, 1)
            .unwrap_err();
        assert_eq!(err, GovernanceError::OperatorAlreadyVoted.into());
        assert_eq!(ballot_box.operator_votes.len(), 1);
    }

    #[test]
    fn test_remove_vote_frees_tally_slot() {
        let voters = operators(5);
        let mut ballot_box = new_box(&voters, 6667);
        record_operator_vote(&mut ballot_box, &voters[0], &ballot(1), NOW, 1).unwrap();
        record_operator_vote(&mut ballot_box, &voters[1], &ballot(2), NOW, 1).unwrap();

        remove_operator_vote(&mut ballot_box, &voters[0], NOW).unwrap();
        assert_eq!(ballot_box.ballot_tallies[0].tally, 0);
        assert_eq!(ballot_box.operator_votes.len(), 1);

        // Operator may vote again; a new ballot claims the free slot
        record_operator_vote(&mut ballot_box, &voters[0], &ballot(3), NOW, 2).unwrap();
        assert_eq!(ballot_box.ballot_tallies.len(), 2);
        assert_eq!(ballot_box.ballot_tallies[0].ballot, ballot(3));
        assert_eq!(ballot_box.ballot_tallies[0].tally, 1);

        let err = remove_operator_vote(&mut ballot_box, &voters[4], NOW).unwrap_err();
        assert_eq!(err, GovernanceError::OperatorVoteNotFound.into());

        let err = remove_operator_vote(&mut ballot_box, &voters[0], NOW + DURATION).unwrap_err();
        assert_eq!(err, GovernanceError::VotingExpired.into());
    }

    #[test]
    fn test_tally_capacity_is_voter_count() {
        let voters = operators(2);
        let mut ballot_box = new_box(&voters, 6667);
        // Two live tallies and no recorded votes for the second operator
        ballot_box.ballot_tallies = vec![
            BallotTally {
                index: 0,
                ballot: ballot(1),
                tally: 1,
            },
            BallotTally {
                index: 1,
                ballot: ballot(2),
                tally: 1,
            },
        ];
        let err = record_operator_vote(&mut ballot_box, &voters[1], &ballot(3), NOW, 1)
            .unwrap_err();
        assert_eq!(err, GovernanceError::VecFull.into());
        assert!(ballot_box.operator_votes.is_empty());
    }

    #[test]
    fn test_tie_breaker_after_stalled_vote() {
        let voters = operators(10);
        let mut ballot_box = new_box(&voters, 6667);
        for operator in voters.iter().take(4) {
            record_operator_vote(&mut ballot_box, operator, &ballot(1), NOW, 1).unwrap();
        }
        for operator in voters.iter().skip(4).take(3) {
            record_operator_vote(&mut ballot_box, operator, &ballot(2), NOW, 1).unwrap();
        }

        let err = set_tie_breaker(&mut ballot_box, &ballot(1), NOW + 10).unwrap_err();
        assert_eq!(err, GovernanceError::VotingNotExpired.into());

        let expired = NOW + DURATION;
        assert_eq!(
            finalize_ballot_box(&ballot_box, expired).unwrap(),
            BallotStatus::Open
        );
        let err = winning_ballot(&ballot_box).unwrap_err();
        assert_eq!(err, GovernanceError::ConsensusNotReached.into());

        set_tie_breaker(&mut ballot_box, &ballot(1), expired).unwrap();
        assert_eq!(ballot_status(&ballot_box), BallotStatus::TieBroken);
        assert_eq!(winning_ballot(&ballot_box).unwrap(), (ballot(1), true));

        let err = set_tie_breaker(&mut ballot_box, &ballot(2), expired).unwrap_err();
        assert_eq!(err, GovernanceError::ConsensusAlreadyReached.into());
    }

    #[test]
    fn test_tie_breaker_rejected_after_consensus() {
        let voters = operators(3);
        let mut ballot_box = new_box(&voters, 6667);
        for operator in &voters {
            record_operator_vote(&mut ballot_box, operator, &ballot(1), NOW, 5).unwrap();
        }
        let err = set_tie_breaker(&mut ballot_box, &ballot(2), NOW + DURATION).unwrap_err();
        assert_eq!(err, GovernanceError::ConsensusAlreadyReached.into());
        assert_eq!(winning_ballot(&ballot_box).unwrap(), (ballot(1), false));
    }

    #[test]
    fn test_finalize_requires_expiry() {
        let ballot_box = new_box(&operators(2), 6667);
        let err = finalize_ballot_box(&ballot_box, NOW).unwrap_err();
        assert_eq!(err, GovernanceError::VotingNotExpired.into());
    }

    #[test]
    fn test_tie_breaker_limited_to_voted_ballots() {
        let voters = operators(5);
        let mut ballot_box = new_box(&voters, 6667);
        record_operator_vote(&mut ballot_box, &voters[0], &ballot(1), NOW, 1).unwrap();
        record_operator_vote(&mut ballot_box, &voters[1], &ballot(2), NOW, 1).unwrap();
        remove_operator_vote(&mut ballot_box, &voters[1], NOW).unwrap();

        let expired = NOW + DURATION;
        let err = set_tie_breaker(&mut ballot_box, &ballot(3), expired).unwrap_err();
        assert_eq!(err, GovernanceError::TieBreakerNotInPriorVotes.into());
        // A withdrawn ballot no longer counts
        let err = set_tie_breaker(&mut ballot_box, &ballot(2), expired).unwrap_err();
        assert_eq!(err, GovernanceError::TieBreakerNotInPriorVotes.into());
        assert!(ballot_box.is_open());

        set_tie_breaker(&mut ballot_box, &ballot(1), expired).unwrap();
        assert_eq!(winning_ballot(&ballot_box).unwrap(), (ballot(1), true));
    }

    #[test]
    fn test_tie_breaker_free_choice_without_votes() {
        let mut ballot_box = new_box(&operators(3), 6667);
        set_tie_breaker(&mut ballot_box, &ballot(9), NOW + DURATION).unwrap();
        assert_eq!(ballot_status(&ballot_box), BallotStatus::TieBroken);
    }

    #[test]
    fn test_resettable_only_when_expired_and_open() {
        let voters = operators(3);
        let mut ballot_box = new_box(&voters, 3000);
        record_operator_vote(&mut ballot_box, &voters[1], &ballot(1), NOW, 1).unwrap();
        assert_eq!(ballot_status(&ballot_box), BallotStatus::ConsensusReached);
        let err = require_resettable(&ballot_box, NOW + DURATION).unwrap_err();
        assert_eq!(err, GovernanceError::ConsensusAlreadyReached.into());

        let ballot_box = new_box(&voters, 6667);
        let err = require_resettable(&ballot_box, NOW + DURATION - 1).unwrap_err();
        assert_eq!(err, GovernanceError::VotingNotExpired.into());
        require_resettable(&ballot_box, NOW + DURATION).unwrap();
    }

    #[test]
    fn test_reopened_box_uses_current_whitelist_and_threshold() {
        let voters = operators(3);
        let first = new_box(&voters, 3000);
        require_resettable(&first, NOW + DURATION).unwrap();

        // The box is closed; the next one snapshots the edited config
        let remaining = voters[1..].to_vec();
        let later = NOW + DURATION + 50;
        let mut reopened = first.clone();
        initialize_ballot_box(
            &mut reopened,
            BallotBoxParams {
                snapshot_slot: first.snapshot_slot,
                proposal: first.proposal,
                payer: Pubkey::new_unique(),
                voter_list: remaining.clone(),
                min_consensus_threshold_bps: 10_000,
                vote_duration: DURATION,
                current_slot: 3_000,
                now: later,
                bump: first.bump,
            },
        )
        .unwrap();
        assert_eq!(reopened.voter_list, remaining);
        assert_eq!(reopened.min_consensus_threshold_bps, 10_000);
        assert_eq!(reopened.vote_expiry_timestamp, later + DURATION);

        let err = record_operator_vote(&mut reopened, &voters[0], &ballot(1), later, 3_001)
            .unwrap_err();
        assert_eq!(err, GovernanceError::Unauthorized.into());

        let reached = record_operator_vote(&mut reopened, &voters[1], &ballot(1), later, 3_001)
            .unwrap();
        assert!(!reached);
        let reached = record_operator_vote(&mut reopened, &voters[2], &ballot(1), later, 3_002)
            .unwrap();
        assert!(reached);
    }

    fn voting_proposal(snapshot_slot: u64) -> Proposal {
        Proposal {
            author: Pubkey::new_unique(),
            vote_account: Pubkey::new_unique(),
            seed: 7,
            index: 0,
            title: "Snapshot".to_string(),
            description: String::new(),
            creation_epoch: 10,
            creation_timestamp: NOW,
            start_epoch: 11,
            end_epoch: 15,
            proposer_stake_weight_bps: 100,
            cluster_support_lamports: 0,
            for_votes_lamports: 0,
            against_votes_lamports: 0,
            abstain_votes_lamports: 0,
            vote_count: 0,
            voting: true,
            finalized: false,
            consensus_result: None,
            snapshot_slot,
            bump: 255,
        }
    }

    #[test]
    fn test_ballot_box_proposal_must_match_slot() {
        let proposal = voting_proposal(1_000);
        require_ballot_box_proposal(&proposal, 1_000).unwrap();

        let err = require_ballot_box_proposal(&proposal, 999).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidProposal.into());
        let err = require_ballot_box_proposal(&proposal, 1_001).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidProposal.into());
    }

    #[test]
    fn test_ballot_box_proposal_must_be_voting() {
        let mut proposal = voting_proposal(1_000);
        proposal.voting = false;
        let err = require_ballot_box_proposal(&proposal, 1_000).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidProposal.into());

        let mut proposal = voting_proposal(1_000);
        proposal.finalized = true;
        let err = require_ballot_box_proposal(&proposal, 1_000).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidProposal.into());
    }
}
