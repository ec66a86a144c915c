//! Operator whitelist helpers

use anchor_lang::prelude::*;

use crate::errors::GovernanceError;
use crate::instructions::constants::MAX_OPERATORS;

/// Validate operator pubkeys in one side of a whitelist update
pub fn validate_operator_keys(operators: &[Pubkey]) -> Result<()> {
    for (index, operator) in operators.iter().enumerate() {
        require!(
            *operator != Pubkey::default(),
            GovernanceError::InvalidOperator
        );
        for other in operators.iter().skip(index + 1) {
            require!(
                *operator != *other,
                GovernanceError::OverlappingWhitelistEntries
            );
        }
    }
    Ok(())
}

/// Compute the whitelist after removing `remove` and appending `add`.
///
/// The current list is not touched; callers commit the returned list.
pub fn updated_whitelist(
    current: &[Pubkey],
    add: &[Pubkey],
    remove: &[Pubkey],
) -> Result<Vec<Pubkey>> {
    validate_operator_keys(add)?;
    validate_operator_keys(remove)?;

    for key in add {
        require!(
            !remove.contains(key),
            GovernanceError::OverlappingWhitelistEntries
        );
        require!(
            !current.contains(key),
            GovernanceError::OverlappingWhitelistEntries
        );
    }
    for key in remove {
        require!(
            current.contains(key),
            GovernanceError::OperatorNotWhitelisted
        );
    }

    let mut next: Vec<Pubkey> = current
        .iter()
        .filter(|key| !remove.contains(key))
        .copied()
        .collect();
    require!(
        next.len() + add.len() <= MAX_OPERATORS,
        GovernanceError::VecFull
    );
    next.extend_from_slice(add);
    Ok(next)
}
