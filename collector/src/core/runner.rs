//! Plan runner: enumerates the work plan and drives every unit through
//! execution, flow building and persistence
//!
//! Enumeration order is fixed (years ascending, commodities in table order
//! with groups expanded, trade pairs in table order) and must stay stable:
//! resumability depends on a later run enumerating the same plan.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use shared::{TradePair, WorkUnit, TRADE_PAIRS};

use crate::core::UnitExecutor;
use crate::error::CollectorResult;
use crate::services::{FlowBuilder, OutputSink};
use crate::traits::Throttle;
use crate::types::{total_trade_value, RunLedger, UnitOutcome};

/// Failure reason recorded when the remote call succeeded but the artifacts
/// could not be written
pub const PERSIST_FAILURE_REASON: &str = "Failed to write output artifacts";

/// Parameters for one bulk collection pass
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub start_year: u16,
    pub end_year: u16,
    /// Commodity groups or concrete keys; groups expand in table order
    pub items: Vec<String>,
    /// Directed pairs to collect, iterated in the given order
    pub pairs: Vec<TradePair>,
    pub delay: Duration,
}

impl RunConfig {
    pub fn new(start_year: u16, end_year: u16, items: Vec<String>, delay: Duration) -> Self {
        Self {
            start_year,
            end_year,
            items,
            pairs: TRADE_PAIRS.to_vec(),
            delay,
        }
    }
}

pub struct PlanRunner {
    executor: UnitExecutor,
    flows: FlowBuilder,
    sink: OutputSink,
    throttle: Arc<dyn Throttle>,
}

impl PlanRunner {
    pub fn new(
        executor: UnitExecutor,
        flows: FlowBuilder,
        sink: OutputSink,
        throttle: Arc<dyn Throttle>,
    ) -> Self {
        Self {
            executor,
            flows,
            sink,
            throttle,
        }
    }

    /// Enumerate the full work plan in its fixed order
    pub fn enumerate_plan(
        start_year: u16,
        end_year: u16,
        items: &[String],
        pairs: &[TradePair],
    ) -> Vec<WorkUnit> {
        let mut plan = Vec::new();
        for year in start_year..=end_year {
            for item in items {
                for pair in pairs {
                    plan.push(WorkUnit::new(year, item, pair));
                }
            }
        }
        plan
    }

    /// Run the full plan, flushing the ledger once at the end
    pub async fn run(&self, config: &RunConfig) -> CollectorResult<RunLedger> {
        let items = shared::expand_items(&config.items);

        tracing::info!("=== Bulk collection started ===");
        tracing::info!("Year range: {}-{}", config.start_year, config.end_year);
        tracing::info!("Items: {}", items.join(", "));
        tracing::info!("Trade pairs: {}", config.pairs.len());

        let plan =
            Self::enumerate_plan(config.start_year, config.end_year, &items, &config.pairs);
        let total = plan.len();
        tracing::info!("{total} units planned");

        let mut ledger = RunLedger::new();
        for (index, unit) in plan.iter().enumerate() {
            let completed = index + 1;
            tracing::debug!(
                "[{completed}/{total}] ({:.1}%) {unit}",
                completed as f64 / total as f64 * 100.0
            );

            match self.executor.execute(unit).await {
                UnitOutcome::Success { records } => {
                    let collection = self.flows.build(&records, unit);
                    let flows = (collection.metadata.processed_records > 0)
                        .then_some(&collection);

                    if self.sink.persist(unit, &records, flows).await {
                        let trade_value = total_trade_value(&records);
                        ledger.record_success(unit, records.len(), trade_value);
                        tracing::debug!(
                            "  ok: ${trade_value:.0} ({} records, {} flows)",
                            records.len(),
                            collection.metadata.processed_records
                        );
                    } else {
                        ledger.record_failure(unit, PERSIST_FAILURE_REASON);
                    }
                }
                UnitOutcome::Failure { reason } => {
                    ledger.record_failure(unit, &reason);
                    tracing::debug!("  failed: {reason}");
                }
            }

            self.throttle.pause(config.delay).await;
        }

        self.log_summary(&ledger, total);
        let path = self.sink.write_run_ledger(&ledger).await?;
        tracing::info!("Collection summary saved: {}", path.display());

        Ok(ledger)
    }

    fn log_summary(&self, ledger: &RunLedger, total: usize) {
        tracing::info!("Bulk collection finished");
        tracing::info!("  total units: {total}");
        tracing::info!("  successful:  {}", ledger.total_successful);
        tracing::info!("  failed:      {}", ledger.total_failed);
        if total > 0 {
            tracing::info!(
                "  success rate: {:.1}%",
                ledger.total_successful as f64 / total as f64 * 100.0
            );
        }

        if !ledger.failed_requests.is_empty() {
            let mut breakdown: BTreeMap<String, usize> = BTreeMap::new();
            for failed in &ledger.failed_requests {
                *breakdown
                    .entry(format!("{}_{}", failed.year, failed.item))
                    .or_default() += 1;
            }
            tracing::info!("Failed requests by year and item:");
            for (key, count) in breakdown {
                tracing::info!("  {key}: {count}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn plan_order_is_years_then_items_then_pairs() {
        let items = vec!["oil".to_string(), "copper".to_string()];
        let plan = PlanRunner::enumerate_plan(2020, 2021, &items, TRADE_PAIRS);

        assert_eq!(plan.len(), 2 * 2 * TRADE_PAIRS.len());
        assert_eq!(plan[0].year, 2020);
        assert_eq!(plan[0].item, "oil");
        assert_eq!(plan[0].reporter_name, "USA");
        // All pairs for (2020, oil) come before (2020, copper)
        assert_eq!(plan[TRADE_PAIRS.len()].item, "copper");
        // Second year starts after the full first-year block
        assert_eq!(plan[2 * TRADE_PAIRS.len()].year, 2021);
    }

    #[test]
    fn plan_units_are_unique_for_duplicate_free_inputs() {
        let items = shared::expand_items(&["semiconductor", "oil", "copper", "plastic"]);
        let plan = PlanRunner::enumerate_plan(2018, 2024, &items, TRADE_PAIRS);

        let identities: HashSet<_> = plan
            .iter()
            .map(|u| {
                (
                    u.year,
                    u.item.clone(),
                    u.reporter_code.clone(),
                    u.partner_code.clone(),
                )
            })
            .collect();
        assert_eq!(identities.len(), plan.len());
    }
}
