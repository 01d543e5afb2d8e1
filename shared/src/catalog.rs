//! Closed value tables for commodities and trade pairs
//!
//! These are constructed once at startup and treated as immutable
//! configuration data. Enumeration order is significant: the plan runner
//! iterates the tables in declaration order, and resumability depends on
//! that order being stable across runs.

use crate::types::TradePair;

/// Commodity key → HS classification code, one code per key
pub const COMMODITIES: &[(&str, &str)] = &[
    ("semiconductor_8541", "8541"), // diodes, transistors
    ("semiconductor_8542", "8542"), // integrated circuits
    ("oil", "2709"),                // crude petroleum
    ("copper", "7403"),             // refined copper and alloys
    ("plastic_3901", "3901"),       // ethylene polymers
    ("plastic_3902", "3902"),       // propylene polymers
    ("plastic_3903", "3903"),       // styrene polymers
];

/// Commodity group → member keys, expanded in declaration order
pub const COMMODITY_GROUPS: &[(&str, &[&str])] = &[
    ("semiconductor", &["semiconductor_8541", "semiconductor_8542"]),
    ("oil", &["oil"]),
    ("copper", &["copper"]),
    ("plastic", &["plastic_3901", "plastic_3902", "plastic_3903"]),
];

/// Major directed trade relationships (reporter ← partner)
pub const TRADE_PAIRS: &[TradePair] = &[
    TradePair { reporter_code: "842", partner_code: "156", reporter_name: "USA", partner_name: "China" },
    TradePair { reporter_code: "842", partner_code: "392", reporter_name: "USA", partner_name: "Japan" },
    TradePair { reporter_code: "842", partner_code: "276", reporter_name: "USA", partner_name: "Germany" },
    TradePair { reporter_code: "842", partner_code: "410", reporter_name: "USA", partner_name: "Korea" },
    TradePair { reporter_code: "276", partner_code: "156", reporter_name: "Germany", partner_name: "China" },
    TradePair { reporter_code: "276", partner_code: "392", reporter_name: "Germany", partner_name: "Japan" },
    TradePair { reporter_code: "392", partner_code: "156", reporter_name: "Japan", partner_name: "China" },
    TradePair { reporter_code: "410", partner_code: "156", reporter_name: "Korea", partner_name: "China" },
    TradePair { reporter_code: "410", partner_code: "392", reporter_name: "Korea", partner_name: "Japan" },
    TradePair { reporter_code: "156", partner_code: "842", reporter_name: "China", partner_name: "USA" },
];

/// Look up the HS classification code for a concrete commodity key
pub fn classification_code(item: &str) -> Option<&'static str> {
    COMMODITIES
        .iter()
        .find(|(key, _)| *key == item)
        .map(|(_, code)| *code)
}

/// Names of the user-facing commodity groups, in declaration order
pub fn group_keys() -> Vec<&'static str> {
    COMMODITY_GROUPS.iter().map(|(key, _)| *key).collect()
}

/// Expand group keys to their concrete member keys
///
/// A concrete key passes through unchanged; an unknown key is logged as a
/// warning and skipped rather than failing the run.
pub fn expand_items<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut expanded = Vec::new();
    for item in items {
        let item = item.as_ref();
        if let Some((_, members)) = COMMODITY_GROUPS.iter().find(|(key, _)| *key == item) {
            expanded.extend(members.iter().map(|m| m.to_string()));
        } else if classification_code(item).is_some() {
            expanded.push(item.to_string());
        } else {
            tracing::warn!("Unknown commodity key: {item}");
        }
    }
    expanded
}

/// Reconstruct reporter/partner country codes from ledger display names
///
/// Linear scan over the static pair table, matching each name against both
/// the reporter-name and partner-name columns; a later tuple overwrites an
/// earlier match. Display names are assumed unique and stable between runs;
/// the ledger does not persist the original codes.
pub fn find_pair_codes(
    reporter_name: &str,
    partner_name: &str,
) -> (Option<String>, Option<String>) {
    let mut reporter_code = None;
    let mut partner_code = None;

    for pair in TRADE_PAIRS {
        if pair.reporter_name == reporter_name {
            reporter_code = Some(pair.reporter_code.to_string());
        }
        if pair.reporter_name == partner_name {
            partner_code = Some(pair.reporter_code.to_string());
        }
        if pair.partner_name == reporter_name {
            reporter_code = Some(pair.partner_code.to_string());
        }
        if pair.partner_name == partner_name {
            partner_code = Some(pair.partner_code.to_string());
        }
    }

    (reporter_code, partner_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_codes_resolve() {
        assert_eq!(classification_code("oil"), Some("2709"));
        assert_eq!(classification_code("semiconductor_8542"), Some("8542"));
        assert_eq!(classification_code("gold"), None);
    }

    #[test]
    fn groups_expand_in_declaration_order() {
        let expanded = expand_items(&["semiconductor", "plastic"]);
        assert_eq!(
            expanded,
            vec![
                "semiconductor_8541",
                "semiconductor_8542",
                "plastic_3901",
                "plastic_3902",
                "plastic_3903"
            ]
        );
    }

    #[test]
    fn concrete_keys_pass_through_and_unknown_keys_are_dropped() {
        let expanded = expand_items(&["oil", "unobtainium", "copper"]);
        assert_eq!(expanded, vec!["oil", "copper"]);
    }

    #[test]
    fn pair_codes_reconstruct_from_display_names() {
        let (reporter, partner) = find_pair_codes("USA", "China");
        assert_eq!(reporter.as_deref(), Some("842"));
        assert_eq!(partner.as_deref(), Some("156"));
    }

    #[test]
    fn unknown_display_name_yields_no_code() {
        let (reporter, partner) = find_pair_codes("Atlantis", "China");
        assert_eq!(reporter, None);
        assert_eq!(partner.as_deref(), Some("156"));
    }

    #[test]
    fn all_trade_pairs_are_distinct() {
        for (i, a) in TRADE_PAIRS.iter().enumerate() {
            for b in &TRADE_PAIRS[i + 1..] {
                assert!(
                    a.reporter_code != b.reporter_code || a.partner_code != b.partner_code,
                    "duplicate pair {}←{}",
                    a.reporter_name,
                    a.partner_name
                );
            }
        }
    }
}
