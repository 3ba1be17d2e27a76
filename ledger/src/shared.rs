//! Thread-safe handle enforcing a total order over ledger operations.
//!
//! Every mutation runs under the write lock for its whole duration (fee
//! settlement included), so no two mutations interleave and no reader sees a
//! half-applied call. Reads share the read lock and observe the state after
//! the most recently completed mutation.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use epoxy_fee::FeeAsset;
use epoxy_types::{Address, SetId};

use crate::error::LedgerError;
use crate::ledger::TokenSetLedger;
use crate::mint::{MintReceipt, MintRequest};

pub struct SharedLedger<F> {
    inner: Arc<RwLock<TokenSetLedger<F>>>,
}

impl<F> Clone for SharedLedger<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: FeeAsset> SharedLedger<F> {
    pub fn new(ledger: TokenSetLedger<F>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    // Operations are atomic (staged, then committed infallibly), so a panic
    // in another holder cannot leave partial state behind the poison flag.
    fn read_guard(&self) -> RwLockReadGuard<'_, TokenSetLedger<F>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, TokenSetLedger<F>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against a consistent snapshot.
    pub fn read<R>(&self, f: impl FnOnce(&TokenSetLedger<F>) -> R) -> R {
        f(&self.read_guard())
    }

    /// Run `f` as one indivisible step.
    pub fn write<R>(&self, f: impl FnOnce(&mut TokenSetLedger<F>) -> R) -> R {
        f(&mut self.write_guard())
    }

    pub fn mint(&self, caller: &Address, request: MintRequest) -> Result<MintReceipt, LedgerError> {
        self.write(|ledger| ledger.mint(caller, request))
    }

    pub fn set_uri(&self, caller: &Address, ids: &[SetId], uris: &[String]) -> Result<(), LedgerError> {
        self.write(|ledger| ledger.set_uri(caller, ids, uris))
    }

    pub fn set_manager(
        &self,
        caller: &Address,
        ids: &[SetId],
        new_manager: Address,
    ) -> Result<(), LedgerError> {
        self.write(|ledger| ledger.set_manager(caller, ids, new_manager))
    }

    pub fn freeze(&self, caller: &Address, ids: &[SetId]) -> Result<(), LedgerError> {
        self.write(|ledger| ledger.freeze(caller, ids))
    }

    pub fn burn(
        &self,
        caller: &Address,
        account: &Address,
        id: &SetId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.write(|ledger| ledger.burn(caller, account, id, amount))
    }

    pub fn balance_of(&self, account: &Address, id: &SetId) -> u128 {
        self.read(|ledger| ledger.balance_of(account, id))
    }

    pub fn total_supply(&self, id: &SetId) -> u128 {
        self.read(|ledger| ledger.total_supply(id))
    }

    pub fn uri(&self, id: &SetId) -> String {
        self.read(|ledger| ledger.uri(id).to_owned())
    }

    pub fn created(&self, id: &SetId) -> bool {
        self.read(|ledger| ledger.created(id))
    }

    pub fn frozen(&self, id: &SetId) -> bool {
        self.read(|ledger| ledger.frozen(id))
    }

    pub fn manager(&self, id: &SetId) -> Option<Address> {
        self.read(|ledger| ledger.manager(id))
    }

    pub fn supports_capability(&self, code: u32) -> bool {
        self.read(|ledger| ledger.supports_capability(code))
    }
}
