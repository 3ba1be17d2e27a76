use std::collections::BTreeMap;

use epoxy_fee::{FeeAssetError, NoFeeAsset};
use epoxy_ledger::{LedgerConfig, LedgerError, MintRequest, TokenSetLedger};
use epoxy_nullables::NullFeeAsset;
use epoxy_types::{Address, SetId};
use proptest::prelude::*;

const URI: &str = "https://example.com/{id}.json";

fn arb_address() -> impl Strategy<Value = Address> {
    (1u8..=16).prop_map(Address::repeat_byte)
}

fn arb_set_id() -> impl Strategy<Value = SetId> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(SetId::from)
}

/// Ids with matching amounts, duplicates allowed.
fn arb_batch() -> impl Strategy<Value = (Vec<SetId>, Vec<u128>)> {
    prop::collection::vec((arb_set_id(), 0u128..1_000), 1..6)
        .prop_map(|pairs| pairs.into_iter().unzip())
}

fn fee_ledger(rate: u64) -> TokenSetLedger<NullFeeAsset> {
    let asset = Address::repeat_byte(0xfe);
    let config = LedgerConfig::new(URI)
        .with_address(Address::repeat_byte(0xee))
        .with_fee(asset, rate);
    TokenSetLedger::new(config, Some(NullFeeAsset::new(asset))).unwrap()
}

proptest! {
    #[test]
    fn every_recipient_gets_every_pair(
        recipients in prop::collection::vec(arb_address(), 0..5),
        (ids, amounts) in arb_batch(),
    ) {
        let mut ledger = TokenSetLedger::without_fees(LedgerConfig::new(URI)).unwrap();
        ledger
            .mint(
                &Address::repeat_byte(0xaa),
                MintRequest::new(recipients.clone(), ids.clone(), amounts.clone()),
            )
            .unwrap();

        let mut per_id: BTreeMap<SetId, u128> = BTreeMap::new();
        for (id, amount) in ids.iter().zip(&amounts) {
            *per_id.entry(id.clone()).or_default() += amount;
        }
        let mut copies: BTreeMap<Address, u128> = BTreeMap::new();
        for to in &recipients {
            *copies.entry(*to).or_default() += 1;
        }
        for (id, sum) in &per_id {
            for (to, n) in &copies {
                prop_assert_eq!(ledger.balance_of(to, id), sum * n);
            }
            prop_assert_eq!(ledger.total_supply(id), sum * recipients.len() as u128);
            prop_assert!(ledger.frozen(id));
        }
    }

    #[test]
    fn fee_is_charged_once_at_n_times_s_times_r(
        recipients in prop::collection::vec(arb_address(), 1..5),
        (ids, amounts) in arb_batch(),
        rate in 0u64..50,
    ) {
        let mut ledger = fee_ledger(rate);
        let caller = Address::repeat_byte(0xaa);
        let receipt = ledger
            .mint(&caller, MintRequest::new(recipients.clone(), ids, amounts.clone()))
            .unwrap();

        let expected = recipients.len() as u128 * amounts.iter().sum::<u128>() * u128::from(rate);
        prop_assert_eq!(receipt.fee, expected);
        let asset = ledger.fee_asset().unwrap();
        prop_assert_eq!(asset.paid_by(&caller), expected);
        prop_assert_eq!(asset.transfers().len(), usize::from(expected > 0));
    }

    #[test]
    fn failed_fee_leaves_ledger_unchanged(
        recipients in prop::collection::vec(arb_address(), 1..4),
        (ids, amounts) in arb_batch(),
        manager in prop::option::of(arb_address()),
    ) {
        let mut ledger = fee_ledger(1);
        ledger
            .fee_asset_mut()
            .unwrap()
            .reject_all(FeeAssetError::Rejected("closed".into()));

        let mut request = MintRequest::new(recipients.clone(), ids.clone(), amounts.clone());
        if let Some(m) = manager {
            request = request.with_manager(m);
        }
        let charged = amounts.iter().any(|a| *a > 0);
        let result = ledger.mint(&Address::repeat_byte(0xaa), request);

        if charged {
            let rejected = matches!(result, Err(LedgerError::FeeTransferFailed(_)));
            prop_assert!(rejected);
            for id in &ids {
                prop_assert!(!ledger.created(id));
                prop_assert_eq!(ledger.total_supply(id), 0);
                for to in &recipients {
                    prop_assert_eq!(ledger.balance_of(to, id), 0);
                }
            }
            prop_assert!(ledger.events().is_empty());
            prop_assert!(ledger.snapshot().unwrap().state.sets.is_empty());
        } else {
            // Zero fee never reaches the asset.
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn manager_is_fixed_at_creation(
        first in arb_address(),
        later in arb_address(),
        id in arb_set_id(),
    ) {
        let mut ledger: TokenSetLedger<NoFeeAsset> =
            TokenSetLedger::without_fees(LedgerConfig::new(URI)).unwrap();
        ledger
            .mint(&first, MintRequest::new(vec![first], vec![id.clone()], vec![1]).with_manager(first))
            .unwrap();
        let _ = ledger.mint(
            &later,
            MintRequest::new(vec![later], vec![id.clone()], vec![1]).with_manager(later),
        );
        prop_assert_eq!(ledger.manager(&id), Some(first));
        prop_assert!(!ledger.frozen(&id));
    }

    #[test]
    fn uri_is_base_or_latest_override(
        overrides in prop::collection::vec(prop::option::of("[a-z]{1,8}"), 1..6),
    ) {
        let m = Address::repeat_byte(1);
        let id = SetId::from("a");
        let mut ledger = TokenSetLedger::without_fees(LedgerConfig::new(URI)).unwrap();
        ledger
            .mint(&m, MintRequest::new(vec![m], vec![id.clone()], vec![1]).with_manager(m))
            .unwrap();

        let mut expected = URI.to_string();
        for value in &overrides {
            let uri = value.as_ref().map(|v| format!("ipfs://{v}")).unwrap_or_default();
            ledger
                .mint(
                    &m,
                    MintRequest::new(vec![m], vec![id.clone()], vec![1]).with_uris(vec![uri.clone()]),
                )
                .unwrap();
            if !uri.is_empty() {
                expected = uri;
            }
        }
        ledger.freeze(&m, &[id.clone()]).unwrap();
        prop_assert_eq!(ledger.uri(&id), expected.as_str());
    }
}
