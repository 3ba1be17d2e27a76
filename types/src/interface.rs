//! Capability codes advertised to discovery tooling.
//!
//! The table is fixed at compile time; probing it never touches ledger state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 4-byte capability code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceId(u32);

impl InterfaceId {
    /// Capability introspection itself.
    pub const INTROSPECTION: Self = Self(0x01ff_c9a7);
    /// Multi-token balance interface.
    pub const MULTI_TOKEN: Self = Self(0xd9b6_7a26);
    /// Metadata-URI interface.
    pub const METADATA_URI: Self = Self(0x0e89_341c);
    /// Reserved code that must never be reported as supported.
    pub const INVALID: Self = Self(0xffff_ffff);

    pub const SUPPORTED: [Self; 3] = [Self::INTROSPECTION, Self::MULTI_TOKEN, Self::METADATA_URI];

    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    pub fn code(&self) -> u32 {
        self.0
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<u32> for InterfaceId {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// Static lookup against the capability table.
pub fn supports_interface(code: u32) -> bool {
    InterfaceId::new(code).is_supported()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_are_supported() {
        assert!(supports_interface(0xd9b67a26));
        assert!(supports_interface(0x0e89341c));
        assert!(supports_interface(0x01ffc9a7));
    }

    #[test]
    fn reserved_and_unknown_codes_are_not() {
        assert!(!supports_interface(InterfaceId::INVALID.code()));
        assert!(!supports_interface(0));
        assert!(!supports_interface(0x80ac58cd));
    }

    #[test]
    fn display_pads_to_eight_digits() {
        assert_eq!(InterfaceId::METADATA_URI.to_string(), "0x0e89341c");
    }
}
