//! Token set records and their lifecycle state.

use epoxy_types::{Address, SetId};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Lifecycle state of a single token set.
///
/// `Uninitialized → Unfrozen → Frozen`, or straight from `Uninitialized` to
/// `Frozen` when the creating mint names no manager. `Frozen` is terminal.
/// There is no unfrozen state without a manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetState {
    /// No mint has ever targeted this id.
    Uninitialized,
    /// Open for further issuance by `manager`.
    Unfrozen { manager: Address },
    /// Terminal. `manager` is whoever managed the set when it froze, if anyone.
    Frozen { manager: Option<Address> },
}

impl SetState {
    /// State a set enters on its first mint.
    ///
    /// This is the only place a mint's proposed manager is ever read.
    pub fn on_creation(proposed_manager: Option<Address>) -> Self {
        match proposed_manager.and_then(Address::non_zero) {
            Some(manager) => Self::Unfrozen { manager },
            None => Self::Frozen { manager: None },
        }
    }

    pub fn is_created(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen { .. })
    }

    pub fn manager(&self) -> Option<Address> {
        match self {
            Self::Uninitialized => None,
            Self::Unfrozen { manager } => Some(*manager),
            Self::Frozen { manager } => *manager,
        }
    }

    /// Guard for every manager-only operation on an existing set: the set must
    /// be unfrozen and `caller` must be its manager. Returns the manager.
    pub fn require_manager(&self, id: &SetId, caller: &Address) -> Result<Address, LedgerError> {
        match self {
            Self::Frozen { .. } => Err(LedgerError::IsFrozen(id.clone())),
            Self::Unfrozen { manager } if manager == caller => Ok(*manager),
            Self::Unfrozen { .. } | Self::Uninitialized => Err(LedgerError::IsNotManager {
                id: id.clone(),
                caller: *caller,
            }),
        }
    }
}

/// Registry record for a created token set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub state: SetState,
    /// Per-set metadata URI. `None` falls back to the ledger's base URI.
    pub uri: Option<String>,
}

impl TokenSet {
    pub fn new(state: SetState) -> Self {
        Self { state, uri: None }
    }
}
