//! Instruction handlers for the validator governance program

pub mod ballot_helpers;
pub mod config_helpers;
pub mod constants;
pub mod proof_helpers;
pub mod proposal_helpers;
pub mod tally_helpers;

pub mod adjust_proposal_timing;
pub mod cast_operator_vote;
pub mod cast_vote;
pub mod cast_vote_override;
pub mod close_meta_merkle_proof;
pub mod create_consensus_result;
pub mod create_proposal;
pub mod finalize_ballot;
pub mod finalize_proposal;
pub mod finalize_proposed_authority;
pub mod flush_merkle_root;
pub mod init_ballot_box;
pub mod init_meta_merkle_proof;
pub mod init_program_config;
pub mod modify_vote;
pub mod modify_vote_override;
pub mod remove_operator_vote;
pub mod reset_ballot_box;
pub mod set_tie_breaker;
pub mod support_proposal;
pub mod update_operator_whitelist;
pub mod update_program_config;

#[allow(ambiguous_glob_reexports)]
pub use adjust_proposal_timing::*;
#[allow(ambiguous_glob_reexports)]
pub use cast_operator_vote::*;
#[allow(ambiguous_glob_reexports)]
pub use cast_vote::*;
#[allow(ambiguous_glob_reexports)]
pub use cast_vote_override::*;
#[allow(ambiguous_glob_reexports)]
pub use close_meta_merkle_proof::*;
#[allow(ambiguous_glob_reexports)]
pub use create_consensus_result::*;
#[allow(ambiguous_glob_reexports)]
pub use create_proposal::*;
#[allow(ambiguous_glob_reexports)]
pub use finalize_ballot::*;
#[allow(ambiguous_glob_reexports)]
pub use finalize_proposal::*;
#[allow(ambiguous_glob_reexports)]
pub use finalize_proposed_authority::*;
#[allow(ambiguous_glob_reexports)]
pub use flush_merkle_root::*;
#[allow(ambiguous_glob_reexports)]
pub use init_ballot_box::*;
#[allow(ambiguous_glob_reexports)]
pub use init_meta_merkle_proof::*;
#[allow(ambiguous_glob_reexports)]
pub use init_program_config::*;
#[allow(ambiguous_glob_reexports)]
pub use modify_vote::*;
#[allow(ambiguous_glob_reexports)]
pub use modify_vote_override::*;
#[allow(ambiguous_glob_reexports)]
pub use remove_operator_vote::*;
#[allow(ambiguous_glob_reexports)]
pub use reset_ballot_box::*;
#[allow(ambiguous_glob_reexports)]
pub use set_tie_breaker::*;
#[allow(ambiguous_glob_reexports)]
pub use support_proposal::*;
#[allow(ambiguous_glob_reexports)]
pub use update_operator_whitelist::*;
#[allow(ambiguous_glob_reexports)]
pub use update_program_config::*;
