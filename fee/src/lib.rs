//! Fee asset: the external fungible balance the ledger pulls minting fees from.
//!
//! The ledger only ever calls [`FeeAsset::transfer_from`]; allowances are
//! granted by payers directly on the asset, never by the ledger.
//! [`InMemoryFeeAsset`] is a complete in-process implementation used by the
//! CLI and by tests that need real allowance bookkeeping.

pub mod asset;
pub mod error;
pub mod memory;

pub use asset::{FeeAsset, NoFeeAsset};
pub use error::FeeAssetError;
pub use memory::InMemoryFeeAsset;
