//! Per-resource operation families exposed by the [`ResourceGateway`].
//!
//! Each module owns the wire DTOs for one upstream resource and the typed
//! gateway methods over it. Wire field names mirror the upstream schema;
//! conversions to domain types happen at this boundary and nowhere else.
//!
//! [`ResourceGateway`]: crate::gateway::ResourceGateway

pub mod addresses;
pub mod business_partners;
pub mod contract_items;
pub mod emails;
pub mod identifiers;
pub mod payment_arrangements;
pub mod phones;
pub mod relationships;

/// Percent-encode a value destined for an OData key segment.
pub(crate) fn key_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// The upstream encodes booleans as an "X" flag.
pub(crate) fn flag_set(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("x")
}

pub(crate) fn flag(value: bool) -> String {
    if value {
        String::from("X")
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_segments_are_percent_encoded() {
        assert_eq!(key_segment("20 00"), "20%2000");
        assert_eq!(key_segment("1001"), "1001");
    }

    #[test]
    fn upstream_flags_round_trip() {
        assert!(flag_set("X"));
        assert!(flag_set("x"));
        assert!(!flag_set(""));
        assert!(!flag_set(" "));
        assert_eq!(flag(true), "X");
        assert_eq!(flag(false), "");
    }
}
