//! Ledger construction settings with TOML file support.

use serde::{Deserialize, Serialize};

use epoxy_types::Address;

use crate::error::LedgerError;

/// Construction-time configuration of a [`TokenSetLedger`](crate::TokenSetLedger).
///
/// Every field is immutable once the ledger is built. Can be loaded from a
/// TOML file via [`LedgerConfig::from_toml_file`] or built programmatically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Metadata URI returned for sets without an override.
    #[serde(default = "default_base_uri")]
    pub base_uri: String,

    /// The ledger's own identity. Minting fees are paid to this account.
    #[serde(default = "default_address")]
    pub address: Address,

    /// Fee asset that minting fees are settled in. `None` disables fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_asset: Option<Address>,

    /// Fee charged per unit minted, in fee asset units.
    #[serde(default)]
    pub fee_rate_per_unit: u64,
}

fn default_base_uri() -> String {
    "https://example.com/{id}.json".into()
}

fn default_address() -> Address {
    Address::ZERO
}

impl LedgerConfig {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn with_fee(mut self, fee_asset: Address, rate_per_unit: u64) -> Self {
        self.fee_asset = Some(fee_asset);
        self.fee_rate_per_unit = rate_per_unit;
        self
    }

    /// Load configuration from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, LedgerError> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// Reject combinations that cannot settle fees.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.fee_asset.is_some_and(|a| a.is_zero()) {
            return Err(LedgerError::Config("fee_asset is the zero address".into()));
        }
        if self.fee_asset.is_some() && self.address.is_zero() {
            return Err(LedgerError::Config(
                "a fee asset requires a non-zero ledger address to receive fees".into(),
            ));
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            address: default_address(),
            fee_asset: None,
            fee_rate_per_unit: 0,
        }
    }
}
