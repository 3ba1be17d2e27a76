//! The collaborator contract the ledger depends on.

use epoxy_types::Address;

use crate::error::FeeAssetError;

/// A fungible asset that supports delegated transfers.
///
/// `transfer_from` moves `amount` from `payer` to `recipient` on behalf of
/// `spender`, consuming allowance previously granted by `payer` to `spender`.
/// A failed call must leave the asset unchanged.
pub trait FeeAsset {
    /// Identity of this asset, matched against the ledger configuration.
    fn address(&self) -> Address;

    fn transfer_from(
        &mut self,
        spender: &Address,
        payer: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), FeeAssetError>;
}

impl<F: FeeAsset + ?Sized> FeeAsset for Box<F> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        payer: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), FeeAssetError> {
        (**self).transfer_from(spender, payer, recipient, amount)
    }
}

/// Placeholder for ledgers built without a fee collaborator. Uninhabited, so
/// a ledger of this type can never hold an asset and never charges fees.
#[derive(Debug, Clone, Copy)]
pub enum NoFeeAsset {}

impl FeeAsset for NoFeeAsset {
    fn address(&self) -> Address {
        match *self {}
    }

    fn transfer_from(
        &mut self,
        _spender: &Address,
        _payer: &Address,
        _recipient: &Address,
        _amount: u128,
    ) -> Result<(), FeeAssetError> {
        match *self {}
    }
}
