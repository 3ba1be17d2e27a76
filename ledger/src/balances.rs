//! Balance table: `(account, set id) → amount`, plus per-set total supply.
//!
//! Like the registry, writes are staged: [`PendingBalances`] reads through to
//! the table, accumulates the resulting balances of a whole operation with
//! checked arithmetic, and only [`BalanceTable::commit`] writes them back.

use std::collections::BTreeMap;

use epoxy_types::{Address, SetId};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BalanceTable {
    balances: BTreeMap<SetId, BTreeMap<Address, u128>>,
    supply: BTreeMap<SetId, u128>,
}

impl BalanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address, id: &SetId) -> u128 {
        self.balances
            .get(id)
            .and_then(|holders| holders.get(account))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_supply(&self, id: &SetId) -> u128 {
        self.supply.get(id).copied().unwrap_or(0)
    }

    /// Every non-zero holding of `id`.
    pub fn holders(&self, id: &SetId) -> impl Iterator<Item = (&Address, u128)> {
        self.balances
            .get(id)
            .into_iter()
            .flatten()
            .filter(|(_, amount)| **amount > 0)
            .map(|(account, amount)| (account, *amount))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SetId, &Address, u128)> {
        self.balances.iter().flat_map(|(id, holders)| {
            holders
                .iter()
                .map(move |(account, amount)| (id, account, *amount))
        })
    }

    pub fn pending(&self) -> PendingBalances<'_> {
        PendingBalances {
            table: self,
            balances: BTreeMap::new(),
            supply: BTreeMap::new(),
        }
    }

    pub fn commit(&mut self, changes: BalanceChanges) {
        for ((id, account), amount) in changes.balances {
            let holders = self.balances.entry(id).or_default();
            if amount == 0 {
                holders.remove(&account);
            } else {
                holders.insert(account, amount);
            }
        }
        for (id, amount) in changes.supply {
            self.supply.insert(id, amount);
        }
    }

    /// Rebuild from raw entries, recomputing supply. Used when restoring a
    /// snapshot.
    pub(crate) fn from_entries(
        entries: impl IntoIterator<Item = (SetId, Address, u128)>,
    ) -> Result<Self, LedgerError> {
        let mut table = Self::new();
        for (id, account, amount) in entries {
            if amount == 0 {
                continue;
            }
            let supply = table.total_supply(&id);
            table
                .supply
                .insert(id.clone(), supply.checked_add(amount).ok_or(LedgerError::Overflow)?);
            table.balances.entry(id).or_default().insert(account, amount);
        }
        Ok(table)
    }
}

/// Staged balance writes for one operation.
pub struct PendingBalances<'a> {
    table: &'a BalanceTable,
    balances: BTreeMap<(SetId, Address), u128>,
    supply: BTreeMap<SetId, u128>,
}

/// The resolved result of a [`PendingBalances`], ready to commit.
#[derive(Clone, Debug, Default)]
pub struct BalanceChanges {
    balances: BTreeMap<(SetId, Address), u128>,
    supply: BTreeMap<SetId, u128>,
}

impl PendingBalances<'_> {
    pub fn balance_of(&self, account: &Address, id: &SetId) -> u128 {
        self.balances
            .get(&(id.clone(), *account))
            .copied()
            .unwrap_or_else(|| self.table.balance_of(account, id))
    }

    fn supply_of(&self, id: &SetId) -> u128 {
        self.supply
            .get(id)
            .copied()
            .unwrap_or_else(|| self.table.total_supply(id))
    }

    /// Credit every `(ids[i], amounts[i])` pair to `to`, minting new supply.
    pub fn mint_batch(
        &mut self,
        to: &Address,
        ids: &[SetId],
        amounts: &[u128],
    ) -> Result<(), LedgerError> {
        check_lengths(ids, amounts)?;
        if to.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        for (id, amount) in ids.iter().zip(amounts) {
            let supply = self
                .supply_of(id)
                .checked_add(*amount)
                .ok_or(LedgerError::Overflow)?;
            self.credit(to, id, *amount)?;
            self.supply.insert(id.clone(), supply);
        }
        Ok(())
    }

    /// Debit every `(ids[i], amounts[i])` pair from `from`, destroying supply.
    pub fn burn_batch(
        &mut self,
        from: &Address,
        ids: &[SetId],
        amounts: &[u128],
    ) -> Result<(), LedgerError> {
        check_lengths(ids, amounts)?;
        for (id, amount) in ids.iter().zip(amounts) {
            self.debit(from, id, *amount)?;
            // Supply is the sum of balances, so it covers any debited amount.
            let supply = self.supply_of(id).saturating_sub(*amount);
            self.supply.insert(id.clone(), supply);
        }
        Ok(())
    }

    /// Move every `(ids[i], amounts[i])` pair from `from` to `to`.
    pub fn transfer_batch(
        &mut self,
        from: &Address,
        to: &Address,
        ids: &[SetId],
        amounts: &[u128],
    ) -> Result<(), LedgerError> {
        check_lengths(ids, amounts)?;
        if to.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        for (id, amount) in ids.iter().zip(amounts) {
            self.debit(from, id, *amount)?;
            self.credit(to, id, *amount)?;
        }
        Ok(())
    }

    pub fn finish(self) -> BalanceChanges {
        BalanceChanges {
            balances: self.balances,
            supply: self.supply,
        }
    }

    fn credit(&mut self, to: &Address, id: &SetId, amount: u128) -> Result<(), LedgerError> {
        let balance = self
            .balance_of(to, id)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert((id.clone(), *to), balance);
        Ok(())
    }

    fn debit(&mut self, from: &Address, id: &SetId, amount: u128) -> Result<(), LedgerError> {
        let available = self.balance_of(from, id);
        let balance = available
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientBalance {
                account: *from,
                id: id.clone(),
                needed: amount,
                available,
            })?;
        self.balances.insert((id.clone(), *from), balance);
        Ok(())
    }
}

pub(crate) fn check_lengths(ids: &[SetId], amounts: &[u128]) -> Result<(), LedgerError> {
    if ids.len() != amounts.len() {
        return Err(LedgerError::LengthMismatch {
            ids: ids.len(),
            amounts: amounts.len(),
        });
    }
    Ok(())
}
