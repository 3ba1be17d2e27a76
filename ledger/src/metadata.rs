//! Metadata URI resolution.

use epoxy_fee::FeeAsset;
use epoxy_types::SetId;

use crate::ledger::TokenSetLedger;

/// Resolve the metadata URI: the set's override if one is recorded, else the
/// base URI. Reads are allowed in every state, frozen included.
pub fn resolve_uri<'a>(base_uri: &'a str, uri_override: Option<&'a str>) -> &'a str {
    match uri_override {
        Some(uri) if !uri.is_empty() => uri,
        _ => base_uri,
    }
}

impl<F: FeeAsset> TokenSetLedger<F> {
    pub fn uri(&self, id: &SetId) -> &str {
        resolve_uri(&self.config.base_uri, self.registry.uri_override(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_when_present() {
        assert_eq!(resolve_uri("base", Some("over")), "over");
    }

    #[test]
    fn empty_or_missing_override_falls_back() {
        assert_eq!(resolve_uri("base", None), "base");
        assert_eq!(resolve_uri("base", Some("")), "base");
    }
}
