//! Manager-only operations: metadata overrides, manager handover, freezing.
//!
//! Each call covers a batch of ids and is all-or-nothing: every id must be an
//! unfrozen set managed by the caller, otherwise nothing changes.

use epoxy_fee::FeeAsset;
use epoxy_types::{Address, SetId};

use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::ledger::TokenSetLedger;

impl<F: FeeAsset> TokenSetLedger<F> {
    /// Overwrite the metadata override of each `ids[i]` with `uris[i]`. An
    /// empty string clears the override, restoring the base URI.
    pub fn set_uri(
        &mut self,
        caller: &Address,
        ids: &[SetId],
        uris: &[String],
    ) -> Result<(), LedgerError> {
        let staged = self.registry.stage_set_uri(caller, ids, uris)?;
        let events: Vec<_> = staged
            .uri_writes()
            .iter()
            .map(|(id, value)| LedgerEvent::Uri {
                id: id.clone(),
                value: value.clone(),
            })
            .collect();
        self.registry.commit(staged);
        for event in events {
            self.emit(event);
        }
        tracing::debug!(caller = %caller, count = ids.len(), "metadata overrides set");
        Ok(())
    }

    /// Hand management of each set in `ids` to `new_manager`.
    pub fn set_manager(
        &mut self,
        caller: &Address,
        ids: &[SetId],
        new_manager: Address,
    ) -> Result<(), LedgerError> {
        let staged = self.registry.stage_set_manager(caller, ids, new_manager)?;
        self.registry.commit(staged);
        for id in ids {
            tracing::info!(id = %id, from = %caller, to = %new_manager, "token set manager changed");
            self.emit(LedgerEvent::ManagerChanged {
                id: id.clone(),
                manager: new_manager,
            });
        }
        Ok(())
    }

    /// Permanently freeze each set in `ids`.
    pub fn freeze(&mut self, caller: &Address, ids: &[SetId]) -> Result<(), LedgerError> {
        let staged = self.registry.stage_freeze(caller, ids)?;
        self.registry.commit(staged);
        for id in ids {
            tracing::info!(id = %id, manager = %caller, "token set frozen");
            self.emit(LedgerEvent::Frozen { id: id.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::mint::MintRequest;
    use epoxy_fee::NoFeeAsset;

    const BASE: &str = "https://example.com/{id}.json";

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn id(s: &str) -> SetId {
        SetId::from(s)
    }

    /// Ledger with set "a" managed by addr(1).
    fn managed() -> TokenSetLedger<NoFeeAsset> {
        let mut ledger = TokenSetLedger::without_fees(LedgerConfig::new(BASE)).unwrap();
        ledger
            .mint(
                &addr(1),
                MintRequest::new(vec![addr(1)], vec![id("a")], vec![1]).with_manager(addr(1)),
            )
            .unwrap();
        ledger.drain_events();
        ledger
    }

    #[test]
    fn manager_sets_and_clears_uri() {
        let mut ledger = managed();
        ledger.set_uri(&addr(1), &[id("a")], &["ipfs://x".into()]).unwrap();
        assert_eq!(ledger.uri(&id("a")), "ipfs://x");

        ledger.set_uri(&addr(1), &[id("a")], &[String::new()]).unwrap();
        assert_eq!(ledger.uri(&id("a")), BASE);
    }

    #[test]
    fn set_uri_shape_mismatch_is_invalid_input() {
        let mut ledger = managed();
        let err = ledger.set_uri(&addr(1), &[id("a")], &[]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput { .. }));
    }

    #[test]
    fn stranger_cannot_set_uri() {
        let mut ledger = managed();
        let err = ledger
            .set_uri(&addr(2), &[id("a")], &["ipfs://x".into()])
            .unwrap_err();
        assert!(matches!(err, LedgerError::IsNotManager { .. }));
        assert_eq!(ledger.uri(&id("a")), BASE);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn handover_moves_mint_rights() {
        let mut ledger = managed();
        ledger.set_manager(&addr(1), &[id("a")], addr(2)).unwrap();
        assert_eq!(ledger.manager(&id("a")), Some(addr(2)));

        let err = ledger
            .mint(&addr(1), MintRequest::new(vec![addr(1)], vec![id("a")], vec![1]))
            .unwrap_err();
        assert!(matches!(err, LedgerError::IsNotManager { .. }));

        ledger
            .mint(&addr(2), MintRequest::new(vec![addr(2)], vec![id("a")], vec![1]))
            .unwrap();
        assert_eq!(ledger.balance_of(&addr(2), &id("a")), 1);
    }

    #[test]
    fn freeze_is_one_way_and_keeps_reads() {
        let mut ledger = managed();
        ledger.set_uri(&addr(1), &[id("a")], &["ipfs://x".into()]).unwrap();
        ledger.freeze(&addr(1), &[id("a")]).unwrap();

        assert!(ledger.frozen(&id("a")));
        assert_eq!(ledger.manager(&id("a")), Some(addr(1)));
        assert_eq!(ledger.uri(&id("a")), "ipfs://x");

        assert!(matches!(
            ledger.freeze(&addr(1), &[id("a")]),
            Err(LedgerError::IsFrozen(_))
        ));
        assert!(matches!(
            ledger.set_uri(&addr(1), &[id("a")], &["ipfs://y".into()]),
            Err(LedgerError::IsFrozen(_))
        ));
        assert!(matches!(
            ledger.set_manager(&addr(1), &[id("a")], addr(2)),
            Err(LedgerError::IsFrozen(_))
        ));
    }

    #[test]
    fn uncreated_set_has_no_manager_to_satisfy() {
        let mut ledger = managed();
        assert!(matches!(
            ledger.freeze(&addr(1), &[id("missing")]),
            Err(LedgerError::IsNotManager { .. })
        ));
    }

    #[test]
    fn freeze_emits_one_event_per_id() {
        let mut ledger = managed();
        ledger
            .mint(
                &addr(1),
                MintRequest::new(vec![addr(1)], vec![id("b")], vec![1]).with_manager(addr(1)),
            )
            .unwrap();
        ledger.drain_events();

        ledger.freeze(&addr(1), &[id("a"), id("b")]).unwrap();
        assert_eq!(
            ledger.drain_events(),
            vec![
                LedgerEvent::Frozen { id: id("a") },
                LedgerEvent::Frozen { id: id("b") },
            ]
        );
    }
}
