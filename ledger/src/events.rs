//! Notifications emitted by committed ledger operations.

use epoxy_types::{Address, SetId};
use serde::{Deserialize, Serialize};

/// Events appended to the ledger's log. Rejected operations emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A single-id balance movement. `from = None` for mints, `to = None` for burns.
    TransferSingle {
        operator: Address,
        from: Option<Address>,
        to: Option<Address>,
        id: SetId,
        amount: u128,
        data: Vec<u8>,
    },
    /// A multi-id balance movement.
    TransferBatch {
        operator: Address,
        from: Option<Address>,
        to: Option<Address>,
        ids: Vec<SetId>,
        amounts: Vec<u128>,
        data: Vec<u8>,
    },
    /// A set was created by its first mint.
    SetCreated {
        id: SetId,
        manager: Option<Address>,
        frozen: bool,
    },
    /// A metadata override was written (empty `value` clears it).
    Uri { id: SetId, value: String },
    ManagerChanged { id: SetId, manager: Address },
    Frozen { id: SetId },
    ApprovalForAll {
        owner: Address,
        operator: Address,
        approved: bool,
    },
    /// A minting fee was settled in the fee asset.
    FeeCharged {
        payer: Address,
        recipient: Address,
        amount: u128,
    },
}

impl LedgerEvent {
    /// Balance movement event for `ids`/`amounts`, single form when there is one id.
    pub(crate) fn transfer(
        operator: Address,
        from: Option<Address>,
        to: Option<Address>,
        ids: &[SetId],
        amounts: &[u128],
        data: &[u8],
    ) -> Self {
        match (ids, amounts) {
            ([id], [amount]) => Self::TransferSingle {
                operator,
                from,
                to,
                id: id.clone(),
                amount: *amount,
                data: data.to_vec(),
            },
            _ => Self::TransferBatch {
                operator,
                from,
                to,
                ids: ids.to_vec(),
                amounts: amounts.to_vec(),
                data: data.to_vec(),
            },
        }
    }
}
