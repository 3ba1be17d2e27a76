//! Shared utilities for the Epoxy workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat};
