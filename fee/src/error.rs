//! Fee asset errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeAssetError {
    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("insufficient fee asset balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("transfer to the zero address")]
    ZeroRecipient,

    #[error("fee asset balance overflow")]
    Overflow,

    #[error("transfer rejected: {0}")]
    Rejected(String),
}
