//! Fundamental types for the Epoxy token set ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, token set identifiers, and the fixed capability table.

pub mod address;
pub mod error;
pub mod interface;
pub mod set_id;

pub use address::Address;
pub use error::AddressError;
pub use interface::{supports_interface, InterfaceId};
pub use set_id::SetId;
