//! Ledger snapshots: capture registry, balances and approvals so a ledger can
//! be persisted and rebuilt.
//!
//! The snapshot hash is Blake2b-256 over the bincode encoding of the captured
//! state, which is deterministic because every collection is ordered. The
//! fee collaborator is not part of a snapshot; it is supplied again on restore.

use serde::{Deserialize, Serialize};

use epoxy_fee::FeeAsset;
use epoxy_types::{Address, SetId};

use crate::balances::BalanceTable;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::ledger::TokenSetLedger;
use crate::registry::Registry;
use crate::token_set::TokenSet;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Captured ledger state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    pub sets: Vec<(SetId, TokenSet)>,
    /// Non-zero balances only.
    pub balances: Vec<(SetId, Address, u128)>,
    pub approvals: Vec<(Address, Address)>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub hash: [u8; 32],
    pub state: SnapshotState,
}

impl LedgerSnapshot {
    pub fn create(state: SnapshotState) -> Result<Self, LedgerError> {
        let hash = compute_hash(&state)?;
        Ok(Self {
            version: SNAPSHOT_VERSION,
            hash,
            state,
        })
    }

    /// Whether the hash matches the captured state.
    pub fn verify(&self) -> bool {
        compute_hash(&self.state).is_ok_and(|h| h == self.hash)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Snapshot(e.to_string()))
    }

    /// Decode and check version and integrity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::Snapshot(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if !snapshot.verify() {
            return Err(LedgerError::Snapshot("snapshot hash mismatch".into()));
        }
        Ok(snapshot)
    }

    pub fn set_count(&self) -> usize {
        self.state.sets.len()
    }
}

fn compute_hash(state: &SnapshotState) -> Result<[u8; 32], LedgerError> {
    use blake2::digest::consts::U32;
    use blake2::{Blake2b, Digest};

    let encoded = bincode::serialize(state).map_err(|e| LedgerError::Snapshot(e.to_string()))?;
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(&encoded);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    Ok(out)
}

impl<F: FeeAsset> TokenSetLedger<F> {
    /// Capture the current state. Pending events are not included.
    pub fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        LedgerSnapshot::create(SnapshotState {
            sets: self
                .registry
                .iter()
                .map(|(id, set)| (id.clone(), set.clone()))
                .collect(),
            balances: self
                .balances
                .iter()
                .filter(|(_, _, amount)| *amount > 0)
                .map(|(id, account, amount)| (id.clone(), *account, amount))
                .collect(),
            approvals: self.approvals.iter().copied().collect(),
        })
    }

    /// Rebuild a ledger from `snapshot` under `config`.
    pub fn restore(
        config: LedgerConfig,
        fee_asset: Option<F>,
        snapshot: LedgerSnapshot,
    ) -> Result<Self, LedgerError> {
        if !snapshot.verify() {
            return Err(LedgerError::Snapshot("snapshot hash mismatch".into()));
        }
        let mut ledger = Self::new(config, fee_asset)?;
        let SnapshotState {
            sets,
            balances,
            approvals,
        } = snapshot.state;

        let mut registry = Registry::new();
        registry.restore(sets)?;
        ledger.registry = registry;
        ledger.balances = BalanceTable::from_entries(balances)?;
        ledger.approvals = approvals.into_iter().collect();
        tracing::info!(
            sets = ledger.registry.len(),
            "token set ledger restored from snapshot"
        );
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mint::MintRequest;
    use epoxy_fee::NoFeeAsset;

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn populated() -> TokenSetLedger<NoFeeAsset> {
        let mut ledger = TokenSetLedger::without_fees(LedgerConfig::default()).unwrap();
        ledger
            .mint(
                &addr(1),
                MintRequest::new(vec![addr(1), addr(2)], vec!["a".into(), "b".into()], vec![3, 4])
                    .with_uris(vec!["ipfs://a".into(), String::new()])
                    .with_manager(addr(1)),
            )
            .unwrap();
        ledger
            .mint(&addr(5), MintRequest::new(vec![addr(5)], vec!["c".into()], vec![9]))
            .unwrap();
        ledger.set_approval_for_all(&addr(2), &addr(3), true).unwrap();
        ledger
    }

    #[test]
    fn snapshot_roundtrip_restores_state() {
        let ledger = populated();
        let bytes = ledger.snapshot().unwrap().to_bytes().unwrap();
        let snapshot = LedgerSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(snapshot.set_count(), 3);

        let restored =
            TokenSetLedger::<NoFeeAsset>::restore(LedgerConfig::default(), None, snapshot).unwrap();
        let a = SetId::from("a");
        let c = SetId::from("c");
        assert_eq!(restored.balance_of(&addr(2), &a), 3);
        assert_eq!(restored.total_supply(&a), 6);
        assert_eq!(restored.manager(&a), Some(addr(1)));
        assert!(!restored.frozen(&a));
        assert!(restored.frozen(&c));
        assert_eq!(restored.uri(&a), "ipfs://a");
        assert!(restored.is_approved_for_all(&addr(2), &addr(3)));
    }

    #[test]
    fn identical_state_hashes_identically() {
        let a = populated().snapshot().unwrap();
        let b = populated().snapshot().unwrap();
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn tampered_snapshot_fails_verification() {
        let mut snapshot = populated().snapshot().unwrap();
        snapshot.state.balances[0].2 += 1;
        assert!(!snapshot.verify());
        let bytes = snapshot.to_bytes().unwrap();
        assert!(matches!(
            LedgerSnapshot::from_bytes(&bytes),
            Err(LedgerError::Snapshot(_))
        ));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(LedgerSnapshot::from_bytes(&[1, 2, 3]).is_err());
    }
}
