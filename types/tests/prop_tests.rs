use proptest::prelude::*;

use epoxy_types::{supports_interface, Address, InterfaceId, SetId};

proptest! {
    /// Address text form parses back to the same bytes.
    #[test]
    fn address_display_parses_back(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::new(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Address::is_zero is true only for all-zero bytes.
    #[test]
    fn address_is_zero_correct(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::new(bytes);
        prop_assert_eq!(addr.is_zero(), bytes == [0u8; 20]);
        prop_assert_eq!(addr.non_zero().is_none(), bytes == [0u8; 20]);
    }

    /// Addresses survive the binary encoding used by snapshots.
    #[test]
    fn address_bincode_roundtrip(bytes in prop::array::uniform20(0u8..)) {
        let addr = Address::new(bytes);
        let encoded = bincode::serialize(&addr).unwrap();
        let decoded: Address = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, addr);
    }

    /// SetId is opaque: equality is plain string equality.
    #[test]
    fn set_id_equality_is_textual(a in "[0-9a-fx]{1,6}", b in "[0-9a-fx]{1,6}") {
        prop_assert_eq!(SetId::new(a.clone()) == SetId::new(b.clone()), a == b);
    }

    /// SetId serializes as a bare JSON string.
    #[test]
    fn set_id_json_is_transparent(raw in "[a-z0-9]{1,12}") {
        let json = serde_json::to_string(&SetId::new(raw.clone())).unwrap();
        prop_assert_eq!(json, format!("\"{raw}\""));
    }

    /// Only the three table codes are ever reported as supported.
    #[test]
    fn capability_table_is_closed(code in any::<u32>()) {
        let expected = InterfaceId::SUPPORTED.iter().any(|i| i.code() == code);
        prop_assert_eq!(supports_interface(code), expected);
    }
}
