//! Property-based fuzz testing library for the validator governance program
//!
//! Drives the program's vote tally, ballot box and merkle helpers with
//! generated inputs and checks governance invariants after every step.
//!
//! # Usage
//!
//! ```bash
//! # Run all property-based tests
//! cargo test --release
//!
//! # Run the fuzz test runner
//! cargo run --release
//!
//! # Run with more iterations
//! PROPTEST_CASES=10000 cargo test --release
//! ```

pub mod arbitrary;
pub mod invariants;
pub mod scenarios;

pub use arbitrary::*;
pub use invariants::*;
pub use scenarios::*;

// Include fuzz targets as test modules
#[cfg(test)]
#[path = "../fuzz_targets/vote_tally.rs"]
mod vote_tally_tests;

#[cfg(test)]
#[path = "../fuzz_targets/vote_override.rs"]
mod vote_override_tests;

#[cfg(test)]
#[path = "../fuzz_targets/ballot_box.rs"]
mod ballot_box_tests;

#[cfg(test)]
#[path = "../fuzz_targets/merkle_proof.rs"]
mod merkle_proof_tests;
