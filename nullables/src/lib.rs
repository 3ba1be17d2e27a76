//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators of the ledger are abstracted behind traits. This
//! crate provides test-friendly implementations that:
//! - Return deterministic results
//! - Can be told to fail programmatically
//! - Record every call for assertions
//!
//! Usage: swap real implementations for nullables in tests.

pub mod fee_asset;

pub use fee_asset::{NullFeeAsset, RecordedTransfer};
