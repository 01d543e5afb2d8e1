//! Collector library for bulk trade-flow data collection
//!
//! Drives a fixed work plan of (year, commodity, reporter, partner) queries
//! against the UN Comtrade API, geocodes the results into directed flow
//! features, persists per-unit artifacts and produces a durable run ledger
//! that a later retry pass can resume from.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use core::{PlanRunner, ResumeDriver, RetryOptions, RunConfig, UnitExecutor};
pub use error::{CollectorError, CollectorResult};
pub use services::{ComtradeClient, CoordinateResolver, FlowBuilder, OutputSink, RealThrottle};
pub use traits::{Throttle, TradeApi, TradeQuery};
pub use types::*;
