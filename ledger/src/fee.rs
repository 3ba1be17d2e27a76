//! Mint fee computation and settlement.

use epoxy_fee::FeeAsset;
use epoxy_types::Address;

use crate::error::LedgerError;

/// Pay-to-mint settings: the collaborator, the per-unit rate, and where fees go.
pub struct FeeSchedule<F> {
    asset: Option<F>,
    rate_per_unit: u128,
    sink: Address,
}

impl<F: FeeAsset> FeeSchedule<F> {
    pub fn new(asset: Option<F>, rate_per_unit: u128, sink: Address) -> Self {
        Self {
            asset,
            rate_per_unit,
            sink,
        }
    }

    pub fn rate_per_unit(&self) -> u128 {
        self.rate_per_unit
    }

    pub fn sink(&self) -> Address {
        self.sink
    }

    pub fn asset(&self) -> Option<&F> {
        self.asset.as_ref()
    }

    pub fn asset_mut(&mut self) -> Option<&mut F> {
        self.asset.as_mut()
    }

    /// Fee owed for `units` minted; zero when no asset is configured.
    pub fn fee_for(&self, units: u128) -> Result<u128, LedgerError> {
        if self.asset.is_none() {
            return Ok(0);
        }
        units
            .checked_mul(self.rate_per_unit)
            .ok_or(LedgerError::Overflow)
    }

    /// Pull `amount` from `payer` into the sink. No external call for a zero
    /// fee or when no asset is configured.
    pub fn settle(&mut self, payer: &Address, amount: u128) -> Result<bool, LedgerError> {
        let Some(asset) = self.asset.as_mut() else {
            return Ok(false);
        };
        if amount == 0 {
            return Ok(false);
        }
        asset
            .transfer_from(&self.sink, payer, &self.sink, amount)
            .map_err(|e| {
                tracing::warn!(payer = %payer, amount, error = %e, "mint fee settlement failed");
                LedgerError::FeeTransferFailed(e)
            })?;
        Ok(true)
    }
}

/// Units minted by one call: every recipient receives the whole batch.
pub fn units_minted(recipients: usize, amounts: &[u128]) -> Result<u128, LedgerError> {
    let per_recipient = amounts
        .iter()
        .try_fold(0u128, |acc, a| acc.checked_add(*a))
        .ok_or(LedgerError::Overflow)?;
    per_recipient
        .checked_mul(recipients as u128)
        .ok_or(LedgerError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use epoxy_fee::{InMemoryFeeAsset, NoFeeAsset};

    #[test]
    fn units_are_recipients_times_batch_sum() {
        assert_eq!(units_minted(3, &[10, 5]).unwrap(), 45);
        assert_eq!(units_minted(0, &[10, 5]).unwrap(), 0);
        assert!(matches!(
            units_minted(2, &[u128::MAX]),
            Err(LedgerError::Overflow)
        ));
    }

    #[test]
    fn no_asset_means_no_fee() {
        let mut schedule: FeeSchedule<NoFeeAsset> = FeeSchedule::new(None, 7, Address::ZERO);
        assert_eq!(schedule.fee_for(100).unwrap(), 0);
        assert!(!schedule.settle(&Address::repeat_byte(1), 0).unwrap());
    }

    #[test]
    fn settle_pulls_from_payer_into_sink() {
        let sink = Address::repeat_byte(0xee);
        let payer = Address::repeat_byte(1);
        let mut asset = InMemoryFeeAsset::new(Address::repeat_byte(0xfe));
        asset.mint(&payer, 100).unwrap();
        asset.approve(&payer, &sink, 100);

        let mut schedule = FeeSchedule::new(Some(asset), 2, sink);
        let fee = schedule.fee_for(20).unwrap();
        assert_eq!(fee, 40);
        assert!(schedule.settle(&payer, fee).unwrap());

        let asset = schedule.asset().unwrap();
        assert_eq!(asset.balance_of(&payer), 60);
        assert_eq!(asset.balance_of(&sink), 40);
    }

    #[test]
    fn zero_fee_skips_the_external_call() {
        let sink = Address::repeat_byte(0xee);
        // No allowance: any real call would fail.
        let asset = InMemoryFeeAsset::new(Address::repeat_byte(0xfe));
        let mut schedule = FeeSchedule::new(Some(asset), 0, sink);
        assert!(!schedule.settle(&Address::repeat_byte(1), 0).unwrap());
    }
}
