//! In-process fungible asset with allowances.

use std::collections::BTreeMap;

use epoxy_types::Address;
use serde::{Deserialize, Serialize};

use crate::asset::FeeAsset;
use crate::error::FeeAssetError;

/// A minimal fungible ledger: balances, allowances, and delegated transfers.
///
/// Every mutating call validates fully before touching state, so a returned
/// error means nothing changed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InMemoryFeeAsset {
    address: Address,
    balances: BTreeMap<Address, u128>,
    /// owner → spender → remaining allowance.
    allowances: BTreeMap<Address, BTreeMap<Address, u128>>,
    total_supply: u128,
}

impl InMemoryFeeAsset {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            total_supply: 0,
        }
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Credit new units to `to`.
    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<(), FeeAssetError> {
        if to.is_zero() {
            return Err(FeeAssetError::ZeroRecipient);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(FeeAssetError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(FeeAssetError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(*to, balance);
        tracing::debug!(to = %to, amount, "fee asset minted");
        Ok(())
    }

    /// Set (not add to) the allowance `owner` grants `spender`.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
        tracing::debug!(owner = %owner, spender = %spender, amount, "fee asset allowance set");
    }

    /// Move units directly from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), FeeAssetError> {
        self.check_move(from, to, amount)?;
        self.apply_move(from, to, amount);
        Ok(())
    }

    fn check_move(&self, from: &Address, to: &Address, amount: u128) -> Result<(), FeeAssetError> {
        if to.is_zero() {
            return Err(FeeAssetError::ZeroRecipient);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(FeeAssetError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if from != to && self.balance_of(to).checked_add(amount).is_none() {
            return Err(FeeAssetError::Overflow);
        }
        Ok(())
    }

    fn apply_move(&mut self, from: &Address, to: &Address, amount: u128) {
        if from == to || amount == 0 {
            return;
        }
        let from_balance = self.balance_of(from) - amount;
        let to_balance = self.balance_of(to) + amount;
        self.balances.insert(*from, from_balance);
        self.balances.insert(*to, to_balance);
    }
}

impl FeeAsset for InMemoryFeeAsset {
    fn address(&self) -> Address {
        self.address
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        payer: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), FeeAssetError> {
        let available = self.allowance(payer, spender);
        if available < amount {
            return Err(FeeAssetError::InsufficientAllowance {
                needed: amount,
                available,
            });
        }
        self.check_move(payer, recipient, amount)?;
        self.apply_move(payer, recipient, amount);
        if let Some(m) = self.allowances.get_mut(payer) {
            m.insert(*spender, available - amount);
        }
        tracing::debug!(payer = %payer, recipient = %recipient, amount, "fee asset transfer_from");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn funded(payer: u8, amount: u128) -> InMemoryFeeAsset {
        let mut asset = InMemoryFeeAsset::new(addr(0xfe));
        asset.mint(&addr(payer), amount).unwrap();
        asset
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut asset = funded(1, 100);
        asset.approve(&addr(1), &addr(9), 60);

        asset.transfer_from(&addr(9), &addr(1), &addr(2), 40).unwrap();

        assert_eq!(asset.balance_of(&addr(1)), 60);
        assert_eq!(asset.balance_of(&addr(2)), 40);
        assert_eq!(asset.allowance(&addr(1), &addr(9)), 20);
        assert_eq!(asset.total_supply(), 100);
    }

    #[test]
    fn transfer_from_without_allowance_fails_unchanged() {
        let mut asset = funded(1, 100);

        let err = asset.transfer_from(&addr(9), &addr(1), &addr(2), 1).unwrap_err();

        assert_eq!(
            err,
            FeeAssetError::InsufficientAllowance {
                needed: 1,
                available: 0
            }
        );
        assert_eq!(asset.balance_of(&addr(1)), 100);
    }

    #[test]
    fn transfer_from_with_insufficient_balance_keeps_allowance() {
        let mut asset = funded(1, 10);
        asset.approve(&addr(1), &addr(9), 50);

        let err = asset.transfer_from(&addr(9), &addr(1), &addr(2), 20).unwrap_err();

        assert!(matches!(err, FeeAssetError::InsufficientBalance { needed: 20, available: 10 }));
        assert_eq!(asset.allowance(&addr(1), &addr(9)), 50);
        assert_eq!(asset.balance_of(&addr(2)), 0);
    }

    #[test]
    fn approve_overwrites_previous_allowance() {
        let mut asset = funded(1, 10);
        asset.approve(&addr(1), &addr(9), 50);
        asset.approve(&addr(1), &addr(9), 5);
        assert_eq!(asset.allowance(&addr(1), &addr(9)), 5);
    }

    #[test]
    fn mint_to_zero_is_rejected() {
        let mut asset = InMemoryFeeAsset::new(addr(0xfe));
        assert_eq!(asset.mint(&Address::ZERO, 1), Err(FeeAssetError::ZeroRecipient));
        assert_eq!(asset.total_supply(), 0);
    }

    #[test]
    fn direct_transfer_moves_balance() {
        let mut asset = funded(1, 10);
        asset.transfer(&addr(1), &addr(3), 4).unwrap();
        assert_eq!(asset.balance_of(&addr(1)), 6);
        assert_eq!(asset.balance_of(&addr(3)), 4);
    }
}
