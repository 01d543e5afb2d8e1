//! UN Comtrade API client with response normalization
//!
//! The remote endpoint answers with one of three shapes: an object carrying
//! a `data` array, a bare array of rows, or an empty/absent body. All three
//! are normalized into `Vec<TradeRecord>` here so callers never branch on
//! response shape.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CollectorError, CollectorResult};
use crate::traits::{TradeApi, TradeQuery};
use crate::types::TradeRecord;

/// Final annual data for goods under the HS classification
const BASE_URL: &str = "https://comtradeapi.un.org/data/v1/get/C/A/HS";

/// Fixed flow direction: imports
const FLOW_IMPORTS: &str = "M";

/// Record cap per query
const MAX_RECORDS: u32 = 100;

/// Real Comtrade client
pub struct ComtradeClient {
    http: reqwest::Client,
    base_url: String,
    subscription_key: Option<String>,
}

impl ComtradeClient {
    /// Create a client; the subscription key is optional (the public tier
    /// works without one, at a lower rate limit)
    pub fn new(subscription_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            subscription_key,
        }
    }

    /// Point the client at a different endpoint (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TradeApi for ComtradeClient {
    async fn fetch(&self, query: &TradeQuery) -> CollectorResult<Vec<TradeRecord>> {
        let mut request = self.http.get(&self.base_url).query(&[
            ("period", query.year.to_string()),
            ("reporterCode", query.reporter_code.clone()),
            ("cmdCode", query.cmd_code.clone()),
            ("flowCode", FLOW_IMPORTS.to_string()),
            ("partnerCode", query.partner_code.clone()),
            ("partner2Code", "0".to_string()),
            ("customsCode", "C00".to_string()),
            ("motCode", "0".to_string()),
            ("maxRecords", MAX_RECORDS.to_string()),
            ("includeDesc", "true".to_string()),
        ]);

        if let Some(key) = &self.subscription_key {
            request = request.header("Ocp-Apim-Subscription-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::Api {
                message: format!("HTTP {status} from trade API"),
            });
        }

        let payload: Value = response.json().await?;
        Ok(normalize_payload(&payload))
    }
}

/// Normalize any of the three response shapes into rows
pub fn normalize_payload(payload: &Value) -> Vec<TradeRecord> {
    let rows = match payload {
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(rows)) => rows.as_slice(),
            _ => return Vec::new(),
        },
        Value::Array(rows) => rows.as_slice(),
        _ => return Vec::new(),
    };

    rows.iter().filter_map(record_from_row).collect()
}

/// Extract one normalized record from a response row
///
/// Non-object rows are dropped; within an object, absent or mistyped fields
/// degrade to `None` (or 0 for the primary value) rather than failing the
/// whole response.
fn record_from_row(row: &Value) -> Option<TradeRecord> {
    let row = row.as_object()?;

    Some(TradeRecord {
        ref_year: field_u16(row, &["refYear", "period"]),
        reporter_code: field_string(row, &["reporterCode"]),
        reporter_desc: field_string(row, &["reporterDesc"]),
        reporter_iso3: field_string(row, &["reporterCodeIsoAlpha3", "reporterISO"]),
        partner_code: field_string(row, &["partnerCode"]),
        partner_desc: field_string(row, &["partnerDesc"]),
        // The API spells the partner ISO column with a capital P in some
        // result sets; accept both.
        partner_iso3: field_string(
            row,
            &["PartnerCodeIsoAlpha3", "partnerCodeIsoAlpha3", "partnerISO"],
        ),
        cmd_code: field_string(row, &["cmdCode"]),
        cmd_desc: field_string(row, &["cmdDesc"]),
        flow_code: field_string(row, &["flowCode"]),
        primary_value: field_f64(row, &["primaryValue"]).unwrap_or(0.0),
        net_weight: field_f64(row, &["netWgt"]),
        quantity: field_f64(row, &["qty"]),
    })
}

/// String field that may arrive as a JSON string or number
fn field_string(row: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match row.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => continue,
        }
    }
    None
}

fn field_f64(row: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<f64> {
    for key in keys {
        match row.get(*key) {
            Some(Value::Number(n)) => return n.as_f64(),
            Some(Value::String(s)) => {
                if let Ok(parsed) = s.parse::<f64>() {
                    return Some(parsed);
                }
            }
            _ => continue,
        }
    }
    None
}

fn field_u16(row: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<u16> {
    field_f64(row, keys).map(|v| v as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_with_data_array_normalizes() {
        let payload = json!({
            "elapsedTime": "0.1 secs",
            "count": 2,
            "data": [
                {
                    "refYear": 2020,
                    "reporterCode": 842,
                    "reporterDesc": "USA",
                    "reporterCodeIsoAlpha3": "USA",
                    "partnerCode": 156,
                    "partnerDesc": "China",
                    "PartnerCodeIsoAlpha3": "CHN",
                    "cmdCode": "2709",
                    "flowCode": "M",
                    "primaryValue": 1234.5,
                    "netWgt": 10.0,
                    "qty": null
                },
                { "primaryValue": "99.5" }
            ]
        });

        let records = normalize_payload(&payload);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reporter_code.as_deref(), Some("842"));
        assert_eq!(records[0].partner_iso3.as_deref(), Some("CHN"));
        assert_eq!(records[0].primary_value, 1234.5);
        assert_eq!(records[0].net_weight, Some(10.0));
        assert_eq!(records[0].quantity, None);
        assert_eq!(records[1].primary_value, 99.5);
    }

    #[test]
    fn bare_array_normalizes_like_tabular() {
        let payload = json!([
            { "reporterDesc": "Japan", "primaryValue": 5.0 },
            { "reporterDesc": "Korea", "primaryValue": 6.0 }
        ]);

        let records = normalize_payload(&payload);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].reporter_desc.as_deref(), Some("Korea"));
    }

    #[test]
    fn empty_and_null_payloads_yield_no_rows() {
        assert!(normalize_payload(&json!({ "data": [] })).is_empty());
        assert!(normalize_payload(&json!({ "data": null })).is_empty());
        assert!(normalize_payload(&json!(null)).is_empty());
        assert!(normalize_payload(&json!({})).is_empty());
    }

    #[test]
    fn non_object_rows_are_dropped() {
        let payload = json!({ "data": [ { "primaryValue": 1.0 }, 42, "junk" ] });
        let records = normalize_payload(&payload);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_primary_value_defaults_to_zero() {
        let payload = json!({ "data": [ { "reporterDesc": "USA" } ] });
        let records = normalize_payload(&payload);
        assert_eq!(records[0].primary_value, 0.0);
    }

    #[test]
    fn lowercase_partner_iso_spelling_is_accepted() {
        let payload = json!({ "data": [ { "partnerCodeIsoAlpha3": "JPN" } ] });
        let records = normalize_payload(&payload);
        assert_eq!(records[0].partner_iso3.as_deref(), Some("JPN"));
    }
}
