//! Per-unit execution against the remote API
//!
//! Classifies every outcome explicitly: a non-empty result set is a success,
//! a clean-but-empty response is a failure with a fixed reason string, and a
//! transport error is a failure carrying the stringified error. The empty
//! case must stay distinguishable from a transport error in the ledger.
//! Retry policy lives with the callers, never here.

use std::sync::Arc;

use shared::WorkUnit;

use crate::traits::{TradeApi, TradeQuery};
use crate::types::UnitOutcome;

/// Failure reason recorded when the remote call succeeds with zero rows
pub const NO_DATA_REASON: &str = "No data returned";

pub struct UnitExecutor {
    api: Arc<dyn TradeApi>,
}

impl UnitExecutor {
    pub fn new(api: Arc<dyn TradeApi>) -> Self {
        Self { api }
    }

    /// Execute one work unit, never propagating remote errors
    pub async fn execute(&self, unit: &WorkUnit) -> UnitOutcome {
        let Some(cmd_code) = shared::classification_code(&unit.item) else {
            return UnitOutcome::Failure {
                reason: format!("Unknown commodity key: {}", unit.item),
            };
        };

        let query = TradeQuery {
            year: unit.year,
            cmd_code: cmd_code.to_string(),
            reporter_code: unit.reporter_code.clone(),
            partner_code: unit.partner_code.clone(),
        };

        tracing::debug!("Collecting {unit}");
        match self.api.fetch(&query).await {
            Ok(records) if !records.is_empty() => UnitOutcome::Success { records },
            Ok(_) => UnitOutcome::Failure {
                reason: NO_DATA_REASON.to_string(),
            },
            Err(e) => UnitOutcome::Failure {
                reason: e.to_string(),
            },
        }
    }
}
