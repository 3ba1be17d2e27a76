//! Token set identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, caller-supplied key naming one token set within the ledger.
///
/// Only compared and hashed; never interpreted numerically, so `"0x1"` and
/// `"1"` name different sets.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(String);

impl SetId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetId({})", self.0)
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
