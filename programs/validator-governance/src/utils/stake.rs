//! Validator identity and stake weight helpers

use anchor_lang::prelude::*;
use solana_program::epoch_stake::{
    get_epoch_stake_for_vote_account, get_epoch_total_stake,
};

use crate::errors::GovernanceError;
use crate::instructions::constants::BASIS_POINTS_DIVISOR;

/// Native vote program
pub mod vote_program {
    use anchor_lang::prelude::*;

    declare_id!("Vote111111111111111111111111111111111111111");
}

/// Byte range of the node identity in serialized vote state
/// (after the 4-byte version tag)
const NODE_PUBKEY_OFFSET: usize = 4;
const NODE_PUBKEY_END: usize = NODE_PUBKEY_OFFSET + 32;

/// Read the node identity from raw vote account data
pub fn identity_from_vote_data(data: &[u8]) -> Result<Pubkey> {
    let bytes: [u8; 32] = data
        .get(NODE_PUBKEY_OFFSET..NODE_PUBKEY_END)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(GovernanceError::InvalidVoteAccount)?;
    Ok(Pubkey::new_from_array(bytes))
}

/// Node identity of a vote-program-owned account
pub fn validator_identity(vote_account: &AccountInfo) -> Result<Pubkey> {
    require_keys_eq!(
        *vote_account.owner,
        vote_program::ID,
        GovernanceError::InvalidVoteAccount
    );
    let data = vote_account.try_borrow_data()?;
    identity_from_vote_data(&data)
}

/// Require `signer` to be the node identity of `vote_account`
pub fn require_validator_identity(vote_account: &AccountInfo, signer: &Pubkey) -> Result<()> {
    let identity = validator_identity(vote_account)?;
    require_keys_eq!(identity, *signer, GovernanceError::Unauthorized);
    Ok(())
}

/// Stake delegated to `vote_account` in the current epoch
pub fn epoch_stake(vote_account: &Pubkey) -> u64 {
    get_epoch_stake_for_vote_account(vote_account)
}

/// Total active stake in the current epoch
pub fn total_epoch_stake() -> u64 {
    get_epoch_total_stake()
}

/// `stake` as a share of `total` in basis points, truncating
pub fn stake_weight_bps(stake: u64, total: u64) -> Result<u64> {
    require!(total > 0, GovernanceError::NotEnoughStake);
    let bps = (stake as u128)
        .checked_mul(BASIS_POINTS_DIVISOR as u128)
        .ok_or(GovernanceError::ArithmeticOverflow)?
        / total as u128;
    u64::try_from(bps).map_err(|_| error!(GovernanceError::ArithmeticOverflow))
}

/// `amount / total >= threshold_bps / 10000`, evaluated without division
pub fn meets_threshold(amount: u64, total: u64, threshold_bps: u16) -> bool {
    (amount as u128) * (BASIS_POINTS_DIVISOR as u128) >= (total as u128) * (threshold_bps as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_vote_data() {
        let identity = Pubkey::new_unique();
        let mut data = vec![0u8; 3762];
        data[0..4].copy_from_slice(&2u32.to_le_bytes());
        data[4..36].copy_from_slice(identity.as_ref());
        assert_eq!(identity_from_vote_data(&data).unwrap(), identity);
    }

    #[test]
    fn test_identity_from_short_data() {
        let err = identity_from_vote_data(&[0u8; 35]).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidVoteAccount.into());
    }

    #[test]
    fn test_validator_identity_checks_owner() {
        let key = Pubkey::new_unique();
        let identity = Pubkey::new_unique();
        let mut lamports = 1_000_000u64;
        let mut data = vec![0u8; 64];
        data[4..36].copy_from_slice(identity.as_ref());

        let wrong_owner = Pubkey::new_unique();
        let info = AccountInfo::new(
            &key,
            false,
            false,
            &mut lamports,
            &mut data,
            &wrong_owner,
            false,
            0,
        );
        let err = validator_identity(&info).unwrap_err();
        assert_eq!(err, GovernanceError::InvalidVoteAccount.into());
    }

    #[test]
    fn test_require_validator_identity() {
        let key = Pubkey::new_unique();
        let identity = Pubkey::new_unique();
        let owner = vote_program::ID;
        let mut lamports = 1_000_000u64;
        let mut data = vec![0u8; 64];
        data[4..36].copy_from_slice(identity.as_ref());
        let info = AccountInfo::new(
            &key,
            false,
            false,
            &mut lamports,
            &mut data,
            &owner,
            false,
            0,
        );

        assert!(require_validator_identity(&info, &identity).is_ok());
        let err = require_validator_identity(&info, &Pubkey::new_unique()).unwrap_err();
        assert_eq!(err, GovernanceError::Unauthorized.into());
    }

    #[test]
    fn test_stake_weight_bps() {
        assert_eq!(stake_weight_bps(1, 4).unwrap(), 2500);
        assert_eq!(stake_weight_bps(1, 3).unwrap(), 3333);
        assert_eq!(stake_weight_bps(u64::MAX, u64::MAX).unwrap(), 10000);
        let err = stake_weight_bps(1, 0).unwrap_err();
        assert_eq!(err, GovernanceError::NotEnoughStake.into());
    }

    #[test]
    fn test_meets_threshold_boundary() {
        // 7 of 10 at 6667 bps: 70000 >= 66670
        assert!(meets_threshold(7, 10, 6667));
        // 6 of 10: 60000 < 66670
        assert!(!meets_threshold(6, 10, 6667));
        // exact boundary counts
        assert!(meets_threshold(500, 10_000, 500));
        assert!(!meets_threshold(499, 10_000, 500));
        assert!(meets_threshold(u64::MAX, u64::MAX, 10000));
    }
}
