//! Fuzz target modules
//!
//! Each module contains property-based tests for one area of the program.
//! Run all tests with: cargo test --release -p validator-governance-fuzz

pub mod ballot_box;
pub mod merkle_proof;
pub mod vote_override;
pub mod vote_tally;
