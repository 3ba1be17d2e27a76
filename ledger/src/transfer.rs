//! Holder-side operations: operator approvals, transfers and burns.
//!
//! These act on balances only. A set's frozen state does not restrict them;
//! freezing governs supply and metadata, not ownership.

use epoxy_fee::FeeAsset;
use epoxy_types::{Address, SetId};

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::ledger::TokenSetLedger;

impl<F: FeeAsset> TokenSetLedger<F> {
    /// Grant or revoke `operator`'s right to move and burn all of `owner`'s
    /// balances.
    pub fn set_approval_for_all(
        &mut self,
        owner: &Address,
        operator: &Address,
        approved: bool,
    ) -> Result<(), LedgerError> {
        if owner == operator {
            return Err(LedgerError::SelfApproval);
        }
        if approved {
            self.approvals.insert((*owner, *operator));
        } else {
            self.approvals.remove(&(*owner, *operator));
        }
        self.emit(LedgerEvent::ApprovalForAll {
            owner: *owner,
            operator: *operator,
            approved,
        });
        Ok(())
    }

    fn require_owner_or_operator(&self, caller: &Address, owner: &Address) -> Result<(), LedgerError> {
        if caller == owner || self.is_approved_for_all(owner, caller) {
            Ok(())
        } else {
            Err(LedgerError::NotApproved {
                owner: *owner,
                caller: *caller,
            })
        }
    }

    pub fn safe_transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        id: &SetId,
        amount: u128,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.safe_batch_transfer_from(
            caller,
            from,
            to,
            std::slice::from_ref(id),
            &[amount],
            data,
        )
    }

    pub fn safe_batch_transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        ids: &[SetId],
        amounts: &[u128],
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.require_owner_or_operator(caller, from)?;
        let mut pending = self.balances.pending();
        pending.transfer_batch(from, to, ids, amounts)?;
        let changes = pending.finish();

        self.balances.commit(changes);
        self.emit(LedgerEvent::transfer(
            *caller,
            Some(*from),
            Some(*to),
            ids,
            amounts,
            data,
        ));
        tracing::debug!(caller = %caller, from = %from, to = %to, ids = ids.len(), "transfer committed");
        Ok(())
    }

    /// Destroy `amount` of `account`'s balance of `id`. No redeem semantics
    /// beyond the decrement and its notification.
    pub fn burn(
        &mut self,
        caller: &Address,
        account: &Address,
        id: &SetId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.burn_batch(caller, account, std::slice::from_ref(id), &[amount])
    }

    pub fn burn_batch(
        &mut self,
        caller: &Address,
        account: &Address,
        ids: &[SetId],
        amounts: &[u128],
    ) -> Result<(), LedgerError> {
        self.require_owner_or_operator(caller, account)?;
        let mut pending = self.balances.pending();
        pending.burn_batch(account, ids, amounts)?;
        let changes = pending.finish();

        self.balances.commit(changes);
        self.emit(LedgerEvent::transfer(
            *caller,
            Some(*account),
            None,
            ids,
            amounts,
            &[],
        ));
        tracing::debug!(caller = %caller, account = %account, ids = ids.len(), "burn committed");
        Ok(())
    }
}
