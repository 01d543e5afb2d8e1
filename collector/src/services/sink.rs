//! Persistence sink for per-unit artifacts and run ledgers
//!
//! Artifact names derive deterministically from the unit identity, so
//! re-running the same unit overwrites its artifacts instead of duplicating
//! them. A write failure is reported as `false` and never raised past this
//! boundary; callers treat it as a failed unit.

use std::path::{Path, PathBuf};

use shared::WorkUnit;

use crate::error::{CollectorError, CollectorResult};
use crate::types::{FlowCollection, RetryLedger, RunLedger, TradeRecord};

pub struct OutputSink {
    output_dir: PathBuf,
}

impl OutputSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Create the output directory; failure here is fatal for the run
    pub async fn ensure_output_dir(&self) -> CollectorResult<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Deterministic artifact base name for one unit
    pub fn base_name(unit: &WorkUnit) -> String {
        format!(
            "trade_{}_{}_{}_{}",
            unit.item, unit.year, unit.reporter_code, unit.partner_code
        )
    }

    /// Write the tabular artifact and, when present, the flow collection
    ///
    /// Returns `false` on any I/O error instead of propagating it.
    pub async fn persist(
        &self,
        unit: &WorkUnit,
        records: &[TradeRecord],
        flows: Option<&FlowCollection>,
    ) -> bool {
        match self.write_artifacts(unit, records, flows).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to persist artifacts for {unit}: {e}");
                false
            }
        }
    }

    async fn write_artifacts(
        &self,
        unit: &WorkUnit,
        records: &[TradeRecord],
        flows: Option<&FlowCollection>,
    ) -> CollectorResult<()> {
        let base = Self::base_name(unit);

        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        let csv_bytes = writer
            .into_inner()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        tokio::fs::write(self.output_dir.join(format!("{base}.csv")), csv_bytes).await?;

        if let Some(flows) = flows {
            let geojson = serde_json::to_vec_pretty(flows)?;
            tokio::fs::write(self.output_dir.join(format!("{base}.geojson")), geojson).await?;
        }

        Ok(())
    }

    /// Flush the run ledger to a timestamp-named summary file
    pub async fn write_run_ledger(&self, ledger: &RunLedger) -> CollectorResult<PathBuf> {
        let path = self.output_dir.join(format!(
            "collection_summary_{}.json",
            shared::logging::file_timestamp()
        ));
        tokio::fs::write(&path, serde_json::to_vec_pretty(ledger)?).await?;
        Ok(path)
    }

    /// Load a prior run's ledger for the retry pass
    pub async fn load_run_ledger(path: &Path) -> CollectorResult<RunLedger> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| CollectorError::Ledger {
                    message: format!("cannot read summary file {}: {e}", path.display()),
                })?;
        serde_json::from_str(&content).map_err(|e| CollectorError::Ledger {
            message: format!("summary file {} is not valid: {e}", path.display()),
        })
    }

    /// Flush the retry ledger to a timestamp-named results file
    pub async fn write_retry_ledger(&self, ledger: &RetryLedger) -> CollectorResult<PathBuf> {
        let path = self.output_dir.join(format!(
            "retry_results_{}.json",
            shared::logging::file_timestamp()
        ));
        tokio::fs::write(&path, serde_json::to_vec_pretty(ledger)?).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TradePair;
    use tempfile::TempDir;

    fn unit() -> WorkUnit {
        WorkUnit::new(
            2020,
            "oil",
            &TradePair {
                reporter_code: "842",
                partner_code: "156",
                reporter_name: "USA",
                partner_name: "China",
            },
        )
    }

    fn records() -> Vec<TradeRecord> {
        vec![TradeRecord {
            reporter_desc: Some("USA".to_string()),
            primary_value: 42.0,
            ..TradeRecord::default()
        }]
    }

    #[test]
    fn base_name_is_deterministic() {
        assert_eq!(OutputSink::base_name(&unit()), "trade_oil_2020_842_156");
    }

    #[tokio::test]
    async fn persist_writes_csv_without_flows() {
        let temp = TempDir::new().unwrap();
        let sink = OutputSink::new(temp.path());

        assert!(sink.persist(&unit(), &records(), None).await);
        let csv_path = temp.path().join("trade_oil_2020_842_156.csv");
        assert!(csv_path.exists());
        assert!(!temp.path().join("trade_oil_2020_842_156.geojson").exists());

        let content = std::fs::read_to_string(csv_path).unwrap();
        assert!(content.starts_with("refYear,reporterCode,reporterDesc"));
        assert!(content.contains("42.0") || content.contains(",42,"));
    }

    #[tokio::test]
    async fn persisting_twice_overwrites_the_same_artifact() {
        let temp = TempDir::new().unwrap();
        let sink = OutputSink::new(temp.path());

        assert!(sink.persist(&unit(), &records(), None).await);
        assert!(sink.persist(&unit(), &records(), None).await);

        let artifacts: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(artifacts.len(), 1);
    }

    #[tokio::test]
    async fn persist_reports_io_failure_instead_of_raising() {
        let temp = TempDir::new().unwrap();
        let sink = OutputSink::new(temp.path().join("does/not/exist"));

        assert!(!sink.persist(&unit(), &records(), None).await);
    }

    #[tokio::test]
    async fn ledger_round_trips_through_the_sink() {
        let temp = TempDir::new().unwrap();
        let sink = OutputSink::new(temp.path());

        let mut ledger = RunLedger::new();
        ledger.record_failure(&unit(), "No data returned");
        let path = sink.write_run_ledger(&ledger).await.unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("collection_summary_"));

        let loaded = OutputSink::load_run_ledger(&path).await.unwrap();
        assert_eq!(loaded.failed_requests, ledger.failed_requests);
    }

    #[tokio::test]
    async fn missing_summary_file_is_a_ledger_error() {
        let result = OutputSink::load_run_ledger(Path::new("/nonexistent/summary.json")).await;
        assert!(matches!(result, Err(CollectorError::Ledger { .. })));
    }
}
