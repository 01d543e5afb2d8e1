//! Core identity types shared by the collector binaries

use serde::{Deserialize, Serialize};

/// One directed reporter←partner relationship from the static pair table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradePair {
    pub reporter_code: &'static str,
    pub partner_code: &'static str,
    pub reporter_name: &'static str,
    pub partner_name: &'static str,
}

/// One (year, commodity, reporter, partner) query to be executed
///
/// Identity is the `(year, item, reporter_code, partner_code)` tuple; the
/// display names are carried alongside for logging and ledger readability.
/// Immutable once enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkUnit {
    pub year: u16,
    pub item: String,
    pub reporter_code: String,
    pub partner_code: String,
    pub reporter_name: String,
    pub partner_name: String,
}

impl WorkUnit {
    pub fn new(year: u16, item: &str, pair: &TradePair) -> Self {
        Self {
            year,
            item: item.to_string(),
            reporter_code: pair.reporter_code.to_string(),
            partner_code: pair.partner_code.to_string(),
            reporter_name: pair.reporter_name.to_string(),
            partner_name: pair.partner_name.to_string(),
        }
    }

    /// Short human-readable label used in progress lines
    pub fn label(&self) -> String {
        format!(
            "{} {} {}←{}",
            self.year, self.item, self.reporter_name, self.partner_name
        )
    }
}

impl std::fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
