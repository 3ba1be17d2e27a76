use epoxy_fee::FeeAssetError;
use epoxy_types::{Address, SetId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("InvalidInput: {reason}")]
    InvalidInput { reason: String },

    #[error("length mismatch: {ids} ids but {amounts} amounts")]
    LengthMismatch { ids: usize, amounts: usize },

    #[error("IsFrozen: token set {0} is frozen")]
    IsFrozen(SetId),

    #[error("IsNotManager: caller {caller} does not manage token set {id}")]
    IsNotManager { id: SetId, caller: Address },

    #[error("FeeTransferFailed: {0}")]
    FeeTransferFailed(#[from] FeeAssetError),

    #[error("mint or transfer to the zero address")]
    ZeroRecipient,

    #[error("insufficient balance of {id} for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        id: SetId,
        needed: u128,
        available: u128,
    },

    #[error("caller {caller} is neither {owner} nor an approved operator")]
    NotApproved { owner: Address, caller: Address },

    #[error("an account cannot set approval status for itself")]
    SelfApproval,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl LedgerError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
