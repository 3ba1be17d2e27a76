//! Token set ledger.
//!
//! Issues and tracks named token sets, each with its own lifecycle:
//! - a set is created by the first mint naming its id;
//! - created with a manager, it stays open for further minting by that manager;
//! - created without one, it is frozen on the spot;
//! - a manager may override metadata, hand over management, or freeze the set;
//! - frozen is terminal.
//!
//! Minting may carry a per-unit fee settled in an external [`FeeAsset`]
//! collaborator. Every operation is all-or-nothing.
//!
//! [`FeeAsset`]: epoxy_fee::FeeAsset

pub mod balances;
pub mod config;
pub mod error;
pub mod events;
pub mod fee;
pub mod ledger;
pub mod manage;
pub mod metadata;
pub mod mint;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod token_set;
pub mod transfer;

pub use balances::BalanceTable;
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use events::LedgerEvent;
pub use fee::{units_minted, FeeSchedule};
pub use ledger::TokenSetLedger;
pub use metadata::resolve_uri;
pub use mint::{MintReceipt, MintRequest};
pub use registry::Registry;
pub use shared::SharedLedger;
pub use snapshot::{LedgerSnapshot, SnapshotState};
pub use token_set::{SetState, TokenSet};
