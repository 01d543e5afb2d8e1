//! Collector-specific data types: normalized records, flow features, ledgers

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::WorkUnit;

/// One normalized row of the remote API's result set
///
/// The remote response is heterogeneous (tabular object, bare list, or
/// empty); every shape is normalized into this struct at the client boundary
/// so downstream code never branches on response shape. Serialized field
/// names follow the API's column names so the CSV export matches the raw
/// result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeRecord {
    #[serde(rename = "refYear")]
    pub ref_year: Option<u16>,
    #[serde(rename = "reporterCode")]
    pub reporter_code: Option<String>,
    #[serde(rename = "reporterDesc")]
    pub reporter_desc: Option<String>,
    #[serde(rename = "reporterCodeIsoAlpha3")]
    pub reporter_iso3: Option<String>,
    #[serde(rename = "partnerCode")]
    pub partner_code: Option<String>,
    #[serde(rename = "partnerDesc")]
    pub partner_desc: Option<String>,
    #[serde(rename = "partnerCodeIsoAlpha3")]
    pub partner_iso3: Option<String>,
    #[serde(rename = "cmdCode")]
    pub cmd_code: Option<String>,
    #[serde(rename = "cmdDesc")]
    pub cmd_desc: Option<String>,
    #[serde(rename = "flowCode")]
    pub flow_code: Option<String>,
    #[serde(rename = "primaryValue")]
    pub primary_value: f64,
    #[serde(rename = "netWgt")]
    pub net_weight: Option<f64>,
    #[serde(rename = "qty")]
    pub quantity: Option<f64>,
}

/// Sum of the primary trade value over a result set
pub fn total_trade_value(records: &[TradeRecord]) -> f64 {
    records.iter().map(|r| r.primary_value).sum()
}

/// Outcome of executing one work unit against the remote API
#[derive(Debug, Clone)]
pub enum UnitOutcome {
    Success { records: Vec<TradeRecord> },
    Failure { reason: String },
}

/// Centroid coordinate for one country, shared by every key that maps to it
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateEntry {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

/// Two-point directed line geometry (partner → reporter)
#[derive(Debug, Clone, Serialize)]
pub struct LineGeometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: [[f64; 2]; 2],
}

impl LineGeometry {
    pub fn new(from: &CoordinateEntry, to: &CoordinateEntry) -> Self {
        Self {
            kind: "LineString",
            coordinates: [[from.lon, from.lat], [to.lon, to.lat]],
        }
    }
}

/// Trade attributes attached to one flow feature
#[derive(Debug, Clone, Serialize)]
pub struct FlowProperties {
    pub reporter_name: String,
    pub partner_name: String,
    pub trade_value: f64,
    pub net_weight: f64,
    pub quantity: f64,
    pub item: String,
    pub year: u16,
    pub flow_direction: String,
}

/// One directed trade relationship rendered as a line geometry
#[derive(Debug, Clone, Serialize)]
pub struct FlowFeature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: LineGeometry,
    pub properties: FlowProperties,
}

/// Metadata describing a flow collection and its drop-rate accounting
///
/// `processed_records <= total_records` always holds; the gap is exactly the
/// number of rows dropped for missing coordinates or malformed fields.
#[derive(Debug, Clone, Serialize)]
pub struct FlowMetadata {
    pub item: String,
    pub year: u16,
    pub reporter: String,
    pub partner: String,
    pub total_flows: usize,
    pub processed_records: usize,
    pub total_records: usize,
    pub created_at: String,
}

/// GeoJSON feature collection of directed trade flows for one work unit
#[derive(Debug, Clone, Serialize)]
pub struct FlowCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<FlowFeature>,
    pub metadata: FlowMetadata,
}

/// Successful-unit summary recorded in the run ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEntry {
    pub year: u16,
    pub item: String,
    pub reporter: String,
    pub partner: String,
    pub records: usize,
    pub trade_value: f64,
}

/// Failed-unit summary recorded in the run ledger
///
/// Country codes are intentionally not persisted; the retry pass
/// reconstructs them from the display names via the static pair table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub year: u16,
    pub item: String,
    pub reporter_name: String,
    pub partner_name: String,
    pub error: String,
}

/// Durable end-of-run record of which units succeeded or failed and why
///
/// Created empty at run start, appended to per unit, flushed to disk exactly
/// once at run end. The sole input to a later retry pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLedger {
    pub collection_date: String,
    pub total_successful: usize,
    pub total_failed: usize,
    pub successful_collections: Vec<SuccessEntry>,
    pub failed_requests: Vec<FailureEntry>,
}

impl RunLedger {
    pub fn new() -> Self {
        Self {
            collection_date: Utc::now().to_rfc3339(),
            total_successful: 0,
            total_failed: 0,
            successful_collections: Vec::new(),
            failed_requests: Vec::new(),
        }
    }

    pub fn record_success(&mut self, unit: &WorkUnit, records: usize, trade_value: f64) {
        self.successful_collections.push(SuccessEntry {
            year: unit.year,
            item: unit.item.clone(),
            reporter: unit.reporter_name.clone(),
            partner: unit.partner_name.clone(),
            records,
            trade_value,
        });
        self.total_successful = self.successful_collections.len();
    }

    pub fn record_failure(&mut self, unit: &WorkUnit, reason: &str) {
        self.failed_requests.push(FailureEntry {
            year: unit.year,
            item: unit.item.clone(),
            reporter_name: unit.reporter_name.clone(),
            partner_name: unit.partner_name.clone(),
            error: reason.to_string(),
        });
        self.total_failed = self.failed_requests.len();
    }
}

impl Default for RunLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Successful-retry summary, including which attempt number succeeded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySuccess {
    pub year: u16,
    pub item: String,
    pub reporter_name: String,
    pub partner_name: String,
    pub records: usize,
    pub trade_value: f64,
    pub attempt: u32,
}

/// Durable record of one retry pass over a prior run ledger's failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryLedger {
    pub retry_date: String,
    pub original_failures: usize,
    pub max_retries: u32,
    pub successful_retries: Vec<RetrySuccess>,
    pub still_failed: Vec<FailureEntry>,
}

impl RetryLedger {
    pub fn new(original_failures: usize, max_retries: u32) -> Self {
        Self {
            retry_date: Utc::now().to_rfc3339(),
            original_failures,
            max_retries,
            successful_retries: Vec::new(),
            still_failed: Vec::new(),
        }
    }
}
