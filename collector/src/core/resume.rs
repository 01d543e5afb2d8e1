//! Resume driver: replays a prior run's failed units from its ledger
//!
//! Country codes are not persisted in the ledger, so each failed unit's
//! reporter/partner codes are reconstructed by a name→code join against the
//! static pair table. A unit whose names cannot be resolved is re-classified
//! as still-failed without any remote call.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use shared::WorkUnit;

use crate::core::UnitExecutor;
use crate::error::CollectorResult;
use crate::services::OutputSink;
use crate::traits::Throttle;
use crate::types::{total_trade_value, RetryLedger, RetrySuccess, UnitOutcome};

/// Parameters for one retry pass
#[derive(Debug, Clone)]
pub struct RetryOptions {
    /// A prior run's collection summary file
    pub summary_file: PathBuf,
    /// Optional commodity filter, expanded through the group table
    pub items: Option<Vec<String>>,
    pub max_attempts: u32,
    pub delay: Duration,
}

pub struct ResumeDriver {
    executor: UnitExecutor,
    sink: OutputSink,
    throttle: Arc<dyn Throttle>,
}

impl ResumeDriver {
    pub fn new(executor: UnitExecutor, sink: OutputSink, throttle: Arc<dyn Throttle>) -> Self {
        Self {
            executor,
            sink,
            throttle,
        }
    }

    /// Replay the failed units, flushing the retry ledger once at the end
    pub async fn retry(&self, options: &RetryOptions) -> CollectorResult<RetryLedger> {
        let prior = OutputSink::load_run_ledger(&options.summary_file).await?;
        let mut failed = prior.failed_requests;
        tracing::info!("Found {} failed requests", failed.len());

        if let Some(filter) = &options.items {
            let keep = shared::expand_items(filter);
            failed.retain(|entry| keep.iter().any(|item| *item == entry.item));
            tracing::info!("Filtered to {} requests for {:?}", failed.len(), filter);
        }

        let mut ledger = RetryLedger::new(failed.len(), options.max_attempts);
        if failed.is_empty() {
            tracing::info!("No failed requests to retry");
            return Ok(ledger);
        }

        let total = failed.len();
        for (index, entry) in failed.iter().enumerate() {
            tracing::info!(
                "[{}/{total}] Retrying: {} {} {}→{}",
                index + 1,
                entry.year,
                entry.item,
                entry.reporter_name,
                entry.partner_name
            );

            let (reporter_code, partner_code) =
                shared::find_pair_codes(&entry.reporter_name, &entry.partner_name);
            let (Some(reporter_code), Some(partner_code)) = (reporter_code, partner_code) else {
                tracing::warn!(
                    "  Could not resolve country codes for {}, {}",
                    entry.reporter_name,
                    entry.partner_name
                );
                ledger.still_failed.push(entry.clone());
                continue;
            };

            let unit = WorkUnit {
                year: entry.year,
                item: entry.item.clone(),
                reporter_code,
                partner_code,
                reporter_name: entry.reporter_name.clone(),
                partner_name: entry.partner_name.clone(),
            };

            let mut succeeded = false;
            for attempt in 1..=options.max_attempts {
                tracing::debug!("  attempt {attempt}/{}", options.max_attempts);
                match self.executor.execute(&unit).await {
                    UnitOutcome::Success { records } => {
                        tracing::info!("  succeeded with {} records", records.len());
                        ledger.successful_retries.push(RetrySuccess {
                            year: unit.year,
                            item: unit.item.clone(),
                            reporter_name: unit.reporter_name.clone(),
                            partner_name: unit.partner_name.clone(),
                            records: records.len(),
                            trade_value: total_trade_value(&records),
                            attempt,
                        });
                        succeeded = true;
                        break;
                    }
                    UnitOutcome::Failure { reason } => {
                        tracing::warn!("  attempt {attempt} failed: {reason}");
                    }
                }
                if attempt < options.max_attempts {
                    self.throttle.pause(options.delay).await;
                }
            }

            if !succeeded {
                tracing::warn!("  all attempts exhausted");
                ledger.still_failed.push(entry.clone());
            }

            if index + 1 < total {
                self.throttle.pause(options.delay).await;
            }
        }

        self.log_summary(&ledger);
        let path = self.sink.write_retry_ledger(&ledger).await?;
        tracing::info!("Retry results saved: {}", path.display());

        Ok(ledger)
    }

    fn log_summary(&self, ledger: &RetryLedger) {
        let successful = ledger.successful_retries.len();
        let still_failed = ledger.still_failed.len();
        tracing::info!("Retry pass finished");
        tracing::info!("  succeeded:    {successful}");
        tracing::info!("  still failed: {still_failed}");
        if successful + still_failed > 0 {
            tracing::info!(
                "  success rate: {:.1}%",
                successful as f64 / (successful + still_failed) as f64 * 100.0
            );
        }
    }
}
