//! On-disk state for the command line: a ledger snapshot plus the in-memory
//! fee asset it settles against.

use std::path::Path;

use anyhow::Context;
use epoxy_fee::InMemoryFeeAsset;
use epoxy_ledger::{LedgerConfig, LedgerError, LedgerSnapshot, SnapshotState, TokenSetLedger};
use epoxy_types::Address;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateFile {
    pub snapshot: LedgerSnapshot,
    pub fee_asset: InMemoryFeeAsset,
}

impl StateFile {
    /// No sets, no balances, and an unfunded fee asset at the configured
    /// address.
    pub fn empty(config: &LedgerConfig) -> Result<Self, LedgerError> {
        Ok(Self {
            snapshot: LedgerSnapshot::create(SnapshotState {
                sets: Vec::new(),
                balances: Vec::new(),
                approvals: Vec::new(),
            })?,
            fee_asset: InMemoryFeeAsset::new(config.fee_asset.unwrap_or(Address::ZERO)),
        })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading state file {}", path.display()))?;
        let state: Self = bincode::deserialize(&bytes)
            .with_context(|| format!("decoding state file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            sets = state.snapshot.set_count(),
            "state file loaded"
        );
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let bytes = bincode::serialize(self).context("encoding state file")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("writing state file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "state file saved");
        Ok(())
    }

    /// Rebuild the ledger. The fee asset is attached only when `config`
    /// names one; otherwise it is carried alongside untouched.
    pub fn open(self, config: LedgerConfig) -> Result<Workspace, LedgerError> {
        let (attached, detached) = if config.fee_asset.is_some() {
            (Some(self.fee_asset), None)
        } else {
            (None, Some(self.fee_asset))
        };
        Ok(Workspace {
            ledger: TokenSetLedger::restore(config, attached, self.snapshot)?,
            detached,
        })
    }
}

/// A restored ledger ready for one command.
pub struct Workspace {
    pub ledger: TokenSetLedger<InMemoryFeeAsset>,
    detached: Option<InMemoryFeeAsset>,
}

impl Workspace {
    pub fn fee_asset(&self) -> Option<&InMemoryFeeAsset> {
        match self.ledger.fee_asset() {
            Some(asset) => Some(asset),
            None => self.detached.as_ref(),
        }
    }

    pub fn fee_asset_mut(&mut self) -> Option<&mut InMemoryFeeAsset> {
        match self.ledger.fee_asset_mut() {
            Some(asset) => Some(asset),
            None => self.detached.as_mut(),
        }
    }

    pub fn into_state(self) -> Result<StateFile, LedgerError> {
        let snapshot = self.ledger.snapshot()?;
        let fee_asset = self
            .ledger
            .fee_asset()
            .cloned()
            .or(self.detached)
            .unwrap_or_else(|| InMemoryFeeAsset::new(Address::ZERO));
        Ok(StateFile {
            snapshot,
            fee_asset,
        })
    }
}
