//! Nullable fee asset: record fee transfers without any real bookkeeping.

use epoxy_fee::{FeeAsset, FeeAssetError};
use epoxy_types::Address;

/// One accepted `transfer_from` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub spender: Address,
    pub payer: Address,
    pub recipient: Address,
    pub amount: u128,
}

/// A test fee asset that accepts every transfer unless told otherwise.
///
/// Failures are scripted: [`NullFeeAsset::fail_next`] rejects the next call
/// only, [`NullFeeAsset::reject_all`] rejects until [`NullFeeAsset::accept_all`].
pub struct NullFeeAsset {
    address: Address,
    accepted: Vec<RecordedTransfer>,
    attempts: usize,
    next_failure: Option<FeeAssetError>,
    persistent_failure: Option<FeeAssetError>,
}

impl NullFeeAsset {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            accepted: Vec::new(),
            attempts: 0,
            next_failure: None,
            persistent_failure: None,
        }
    }

    /// Reject the next call with `error`.
    pub fn fail_next(&mut self, error: FeeAssetError) {
        self.next_failure = Some(error);
    }

    /// Reject every call with `error`.
    pub fn reject_all(&mut self, error: FeeAssetError) {
        self.persistent_failure = Some(error);
    }

    pub fn accept_all(&mut self) {
        self.next_failure = None;
        self.persistent_failure = None;
    }

    /// Accepted transfers, in call order (for assertions).
    pub fn transfers(&self) -> &[RecordedTransfer] {
        &self.accepted
    }

    /// Every call, accepted or rejected.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Sum paid by `payer` across accepted transfers.
    pub fn paid_by(&self, payer: &Address) -> u128 {
        self.accepted
            .iter()
            .filter(|t| t.payer == *payer)
            .map(|t| t.amount)
            .sum()
    }

    /// Clear all state.
    pub fn reset(&mut self) {
        self.accepted.clear();
        self.attempts = 0;
        self.accept_all();
    }
}

impl FeeAsset for NullFeeAsset {
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
        self.attempts += 1;
        if let Some(error) = self.next_failure.take() {
            return Err(error);
        }
        if let Some(error) = &self.persistent_failure {
            return Err(error.clone());
        }
        self.accepted.push(RecordedTransfer {
            spender: *spender,
            payer: *payer,
            recipient: *recipient,
            amount,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    #[test]
    fn records_accepted_transfers() {
        let mut asset = NullFeeAsset::new(addr(0xfe));
        asset.transfer_from(&addr(9), &addr(1), &addr(9), 5).unwrap();
        asset.transfer_from(&addr(9), &addr(1), &addr(9), 7).unwrap();
        assert_eq!(asset.transfers().len(), 2);
        assert_eq!(asset.paid_by(&addr(1)), 12);
    }

    #[test]
    fn fail_next_is_one_shot() {
        let mut asset = NullFeeAsset::new(addr(0xfe));
        asset.fail_next(FeeAssetError::Rejected("nope".into()));
        assert!(asset.transfer_from(&addr(9), &addr(1), &addr(9), 5).is_err());
        assert!(asset.transfer_from(&addr(9), &addr(1), &addr(9), 5).is_ok());
        assert_eq!(asset.attempts(), 2);
        assert_eq!(asset.transfers().len(), 1);
    }

    #[test]
    fn reject_all_until_accept_all() {
        let mut asset = NullFeeAsset::new(addr(0xfe));
        asset.reject_all(FeeAssetError::Rejected("paused".into()));
        assert!(asset.transfer_from(&addr(9), &addr(1), &addr(9), 1).is_err());
        assert!(asset.transfer_from(&addr(9), &addr(1), &addr(9), 1).is_err());
        asset.accept_all();
        assert!(asset.transfer_from(&addr(9), &addr(1), &addr(9), 1).is_ok());
    }
}
