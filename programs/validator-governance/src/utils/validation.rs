//! Input validation utilities for proposal text

use anchor_lang::prelude::*;

use crate::errors::GovernanceError;
use crate::instructions::constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};

/// Validates that a string contains only printable ASCII characters.
///
/// Strings stored in proposal accounts are rendered by explorers and wallets,
/// so control characters and non-ASCII bytes are rejected.
///
/// # Examples
/// ```
/// use validator_governance::utils::validation::validate_string_input;
///
/// assert!(validate_string_input("SIMD-0123: raise compute limit"));
/// assert!(!validate_string_input("hello\x00world")); // null byte
/// assert!(!validate_string_input("hello\nworld"));   // newline
/// ```
pub fn validate_string_input(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_graphic() || c == ' ')
}

/// Validate a proposal title and description reference
pub fn validate_proposal_text(title: &str, description: &str) -> Result<()> {
    require!(
        !title.is_empty() && title.len() <= MAX_TITLE_LENGTH,
        GovernanceError::InvalidProposalText
    );
    require!(
        description.len() <= MAX_DESCRIPTION_LENGTH,
        GovernanceError::InvalidProposalText
    );
    require!(
        validate_string_input(title) && validate_string_input(description),
        GovernanceError::InvalidProposalText
    );
    Ok(())
}
