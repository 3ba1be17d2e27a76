//! The token set ledger: registry, balance table, approvals and fee schedule
//! behind one owned value.
//!
//! Every mutating operation follows the same shape: stage registry and balance
//! writes against the current state, run any external step (fee settlement),
//! then commit the staged writes and append events. Nothing is written until
//! every fallible step has succeeded, so a rejected call leaves the ledger
//! exactly as it was.

use std::collections::BTreeSet;

use epoxy_fee::{FeeAsset, NoFeeAsset};
use epoxy_types::{supports_interface, Address, SetId};

use crate::balances::BalanceTable;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::fee::FeeSchedule;
use crate::registry::Registry;
use crate::token_set::SetState;

pub struct TokenSetLedger<F> {
    pub(crate) config: LedgerConfig,
    pub(crate) registry: Registry,
    pub(crate) balances: BalanceTable,
    /// `(owner, operator)` pairs with approval for all of owner's balances.
    pub(crate) approvals: BTreeSet<(Address, Address)>,
    pub(crate) fees: FeeSchedule<F>,
    pub(crate) events: Vec<LedgerEvent>,
}

impl TokenSetLedger<NoFeeAsset> {
    /// A ledger that never charges minting fees.
    ///
    /// Fails if `config` names a fee asset, since there is nothing to settle in.
    pub fn without_fees(config: LedgerConfig) -> Result<Self, LedgerError> {
        Self::new(config, None)
    }
}

impl<F: FeeAsset> TokenSetLedger<F> {
    /// Build an empty ledger.
    ///
    /// `fee_asset` must be present exactly when `config.fee_asset` is set, and
    /// its address must match.
    pub fn new(config: LedgerConfig, fee_asset: Option<F>) -> Result<Self, LedgerError> {
        config.validate()?;
        match (&config.fee_asset, &fee_asset) {
            (Some(expected), Some(asset)) if asset.address() != *expected => {
                return Err(LedgerError::Config(format!(
                    "fee asset {} does not match configured {}",
                    asset.address(),
                    expected
                )));
            }
            (Some(expected), None) => {
                return Err(LedgerError::Config(format!(
                    "fee asset {expected} configured but not supplied"
                )));
            }
            (None, Some(asset)) => {
                return Err(LedgerError::Config(format!(
                    "fee asset {} supplied but not configured",
                    asset.address()
                )));
            }
            _ => {}
        }
        let fees = FeeSchedule::new(
            fee_asset,
            u128::from(config.fee_rate_per_unit),
            config.address,
        );
        tracing::debug!(
            address = %config.address,
            base_uri = %config.base_uri,
            fee_rate = config.fee_rate_per_unit,
            "token set ledger created"
        );
        Ok(Self {
            config,
            registry: Registry::new(),
            balances: BalanceTable::new(),
            approvals: BTreeSet::new(),
            fees,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn address(&self) -> Address {
        self.config.address
    }

    pub fn base_uri(&self) -> &str {
        &self.config.base_uri
    }

    pub fn fee_rate_per_unit(&self) -> u128 {
        self.fees.rate_per_unit()
    }

    pub fn fee_asset(&self) -> Option<&F> {
        self.fees.asset()
    }

    /// Direct access to the collaborator, e.g. for payers granting allowances
    /// on an in-process asset. The ledger itself only calls `transfer_from`.
    pub fn fee_asset_mut(&mut self) -> Option<&mut F> {
        self.fees.asset_mut()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn balance_of(&self, account: &Address, id: &SetId) -> u128 {
        self.balances.balance_of(account, id)
    }

    /// Pairwise lookup of `accounts[i]`'s balance of `ids[i]`.
    pub fn balance_of_batch(
        &self,
        accounts: &[Address],
        ids: &[SetId],
    ) -> Result<Vec<u128>, LedgerError> {
        if accounts.len() != ids.len() {
            return Err(LedgerError::LengthMismatch {
                ids: ids.len(),
                amounts: accounts.len(),
            });
        }
        Ok(accounts
            .iter()
            .zip(ids)
            .map(|(account, id)| self.balances.balance_of(account, id))
            .collect())
    }

    pub fn total_supply(&self, id: &SetId) -> u128 {
        self.balances.total_supply(id)
    }

    pub fn state(&self, id: &SetId) -> SetState {
        self.registry.state(id)
    }

    pub fn created(&self, id: &SetId) -> bool {
        self.registry.state(id).is_created()
    }

    pub fn frozen(&self, id: &SetId) -> bool {
        self.registry.state(id).is_frozen()
    }

    pub fn manager(&self, id: &SetId) -> Option<Address> {
        self.registry.state(id).manager()
    }

    pub fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.approvals.contains(&(*owner, *operator))
    }

    pub fn supports_capability(&self, code: u32) -> bool {
        supports_interface(code)
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take every event emitted so far.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        tracing::trace!(?event, "ledger event");
        self.events.push(event);
    }
}
