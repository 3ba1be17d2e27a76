//! Batch minting.

use epoxy_fee::FeeAsset;
use epoxy_types::{Address, SetId};
use serde::{Deserialize, Serialize};

use crate::balances::check_lengths;
use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::fee::units_minted;
use crate::ledger::TokenSetLedger;

/// Arguments of one mint call.
///
/// Every recipient receives every `(ids[i], amounts[i])` pair. `uris[i]`, when
/// non-empty, becomes the metadata override of `ids[i]`. `manager` only has an
/// effect on ids this call creates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub recipients: Vec<Address>,
    pub ids: Vec<SetId>,
    pub amounts: Vec<u128>,
    pub uris: Vec<String>,
    /// Opaque payload forwarded into the transfer events.
    pub data: Vec<u8>,
    pub manager: Option<Address>,
}

impl MintRequest {
    /// A request with no overrides, no data and no manager.
    pub fn new(recipients: Vec<Address>, ids: Vec<SetId>, amounts: Vec<u128>) -> Self {
        let uris = vec![String::new(); ids.len()];
        Self {
            recipients,
            ids,
            amounts,
            uris,
            data: Vec::new(),
            manager: None,
        }
    }

    pub fn with_uris(mut self, uris: Vec<String>) -> Self {
        self.uris = uris;
        self
    }

    pub fn with_manager(mut self, manager: Address) -> Self {
        self.manager = Some(manager);
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}

/// What a successful mint did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    /// Sum of amounts across all recipients.
    pub units_minted: u128,
    /// Fee settled in the fee asset (zero when none was charged).
    pub fee: u128,
    /// Ids created by this call, in first-appearance order.
    pub created: Vec<SetId>,
}

impl<F: FeeAsset> TokenSetLedger<F> {
    /// Mint a batch into every recipient, creating sets as needed and
    /// charging `caller` the minting fee.
    ///
    /// Validation order: uri shape (`InvalidInput`), id/amount shape
    /// (`LengthMismatch`), per-set state machine (`IsFrozen`,
    /// `IsNotManager`), balance arithmetic, then fee settlement
    /// (`FeeTransferFailed`). Any failure leaves the ledger untouched.
    pub fn mint(
        &mut self,
        caller: &Address,
        request: MintRequest,
    ) -> Result<MintReceipt, LedgerError> {
        let MintRequest {
            recipients,
            ids,
            amounts,
            uris,
            data,
            manager,
        } = request;

        if ids.len() != uris.len() {
            return Err(LedgerError::invalid_input(format!(
                "{} ids but {} uris",
                ids.len(),
                uris.len()
            )));
        }
        check_lengths(&ids, &amounts)?;

        let staged_sets = self.registry.stage_mint(caller, &ids, &uris, manager)?;

        let mut pending = self.balances.pending();
        for to in &recipients {
            pending.mint_batch(to, &ids, &amounts)?;
        }
        let balance_changes = pending.finish();

        let units = units_minted(recipients.len(), &amounts)?;
        let fee = self.fees.fee_for(units)?;
        let charged = self.fees.settle(caller, fee)?;

        // Everything below is infallible.
        let created = staged_sets.created().to_vec();
        let mut events = Vec::new();
        for id in &created {
            if let Some(record) = staged_sets.record(id) {
                tracing::info!(
                    id = %id,
                    frozen = record.state.is_frozen(),
                    manager = ?record.state.manager(),
                    "token set created"
                );
                events.push(LedgerEvent::SetCreated {
                    id: id.clone(),
                    manager: record.state.manager(),
                    frozen: record.state.is_frozen(),
                });
            }
        }
        for (id, value) in staged_sets.uri_writes() {
            events.push(LedgerEvent::Uri {
                id: id.clone(),
                value: value.clone(),
            });
        }
        for to in &recipients {
            events.push(LedgerEvent::transfer(
                *caller,
                None,
                Some(*to),
                &ids,
                &amounts,
                &data,
            ));
        }
        if charged {
            events.push(LedgerEvent::FeeCharged {
                payer: *caller,
                recipient: self.fees.sink(),
                amount: fee,
            });
        }

        self.registry.commit(staged_sets);
        self.balances.commit(balance_changes);
        for event in events {
            self.emit(event);
        }

        tracing::debug!(
            caller = %caller,
            recipients = recipients.len(),
            ids = ids.len(),
            units,
            fee = if charged { fee } else { 0 },
            "mint committed"
        );
        Ok(MintReceipt {
            units_minted: units,
            fee: if charged { fee } else { 0 },
            created,
        })
    }
}
