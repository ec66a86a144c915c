//! Fuzz test runner for the validator governance program
//!
//! Run with: cargo run --release
//! Or: cargo test (for property-based tests)

use proptest::prelude::*;
use proptest::strategy::ValueTree;
use std::fmt::Debug;
use std::time::Instant;
use validator_governance_fuzz::*;

fn main() {
    println!("=== Validator Governance Fuzz Testing ===\n");

    let start = Instant::now();
    let mut total_tests = 0;
    let mut passed = 0;
    let mut failed = 0;

    println!("Running cast_vote fuzz tests...");
    let (p, f) = run_fuzz::<CastVoteInput>("cast_vote", 200, simulate_cast_vote);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running vote_override fuzz tests...");
    let (p, f) = run_fuzz::<VoteTallyInput>("vote_override", 200, simulate_vote_tally);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running ballot_box fuzz tests...");
    let (p, f) = run_fuzz::<BallotBoxInput>("ballot_box", 100, simulate_ballot_box);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running merkle_proof fuzz tests...");
    let (p, f) = run_fuzz::<MerkleProofInput>("merkle_proof", 200, simulate_merkle_proof);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running edge case tests...");
    let (p, f) = run_edge_case_tests();
    passed += p;
    failed += f;
    total_tests += p + f;

    let duration = start.elapsed();

    println!("\n=== Fuzz Testing Complete ===");
    println!("Total tests: {}", total_tests);
    println!("Passed: {}", passed);
    println!("Failed: {}", failed);
    println!("Duration: {:?}", duration);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn run_fuzz<I>(name: &str, iterations: usize, simulate: fn(&I) -> SimulationResult) -> (usize, usize)
where
    I: Arbitrary + Debug,
{
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let input = any::<I>()
            .new_tree(&mut runner)
            .expect("Failed to generate fuzz input")
            .current();

        let result = simulate(&input);

        if result.is_invariant_violation() {
            println!("  [FAIL] Iteration {}: {:?}\n    input: {:?}", i, result, input);
            failed += 1;
        } else {
            passed += 1;
        }
    }

    println!("  {}: {} passed, {} failed", name, passed, failed);
    (passed, failed)
}

fn record(label: &str, result: SimulationResult, passed: &mut usize, failed: &mut usize) {
    if result.is_invariant_violation() {
        println!("  [FAIL] {}: {:?}", label, result);
        *failed += 1;
    } else {
        *passed += 1;
    }
}

fn run_edge_case_tests() -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    // u64::MAX stake voting all-for
    record(
        "u64::MAX stake",
        simulate_cast_vote(&CastVoteInput {
            stake: u64::MAX,
            split: (10_000, 0, 0),
        }),
        &mut passed,
        &mut failed,
    );

    // Zero stake is rejected
    record(
        "zero stake",
        simulate_cast_vote(&CastVoteInput {
            stake: 0,
            split: (3_333, 3_333, 3_334),
        }),
        &mut passed,
        &mut failed,
    );

    // Delegators override the full validator stake before the validator votes
    record(
        "full override first",
        simulate_vote_tally(&VoteTallyInput {
            validator_stake: 1_000_003,
            split: (3_333, 3_333, 3_334),
            modified_split: Some((0, 10_000, 0)),
            overrides: vec![
                OverrideInput {
                    stake_share_bps: 5_000,
                    split: (10_000, 0, 0),
                    modified_split: None,
                },
                OverrideInput {
                    stake_share_bps: 5_000,
                    split: (0, 0, 10_000),
                    modified_split: Some((5_000, 5_000, 0)),
                },
                OverrideInput {
                    stake_share_bps: 1,
                    split: (10_000, 0, 0),
                    modified_split: None,
                },
            ],
            validator_first: false,
            prior_votes: Vec::new(),
        }),
        &mut passed,
        &mut failed,
    );

    // Maximum whitelist with every operator on the same ballot
    record(
        "64 operators unanimous",
        simulate_ballot_box(&BallotBoxInput {
            operator_count: 64,
            threshold_bps: 10_000,
            ops: (0..64u8)
                .map(|operator| BallotOp::Vote {
                    operator,
                    choice: 1,
                })
                .collect(),
            tie_breaker_choice: 2,
        }),
        &mut passed,
        &mut failed,
    );

    // Expiry without any votes goes to the tie-breaker
    record(
        "tie-breaker",
        simulate_ballot_box(&BallotBoxInput {
            operator_count: 10,
            threshold_bps: 6_667,
            ops: Vec::new(),
            tie_breaker_choice: 5,
        }),
        &mut passed,
        &mut failed,
    );

    println!("  edge cases: {} passed, {} failed", passed, failed);
    (passed, failed)
}
