//! Shared configuration tables and types for the trade-flow collection system
//!
//! Contains only what every binary needs: the closed commodity/country tables,
//! the work-unit identity type and the tracing bootstrap. Component-internal
//! types (records, ledgers, GeoJSON shapes) live in the collector crate.

pub mod catalog;
pub mod logging;
pub mod types;

pub use catalog::{
    classification_code, expand_items, find_pair_codes, group_keys, COMMODITIES,
    COMMODITY_GROUPS, TRADE_PAIRS,
};
pub use types::{TradePair, WorkUnit};
