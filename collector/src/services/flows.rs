//! Geocoded flow builder
//!
//! Turns a unit's normalized result rows into directed line features
//! (partner → reporter). This is a best-effort transform: a row that cannot
//! be geocoded on either endpoint is skipped, never an error, and the
//! collection metadata keeps the drop rate auditable.

use std::sync::Arc;

use chrono::Utc;
use shared::WorkUnit;

use crate::services::CoordinateResolver;
use crate::types::{
    CoordinateEntry, FlowCollection, FlowFeature, FlowMetadata, FlowProperties, LineGeometry,
    TradeRecord,
};

pub struct FlowBuilder {
    resolver: Arc<CoordinateResolver>,
}

impl FlowBuilder {
    pub fn new(resolver: Arc<CoordinateResolver>) -> Self {
        Self { resolver }
    }

    /// Build the flow collection for one successful unit
    pub fn build(&self, records: &[TradeRecord], unit: &WorkUnit) -> FlowCollection {
        let mut features = Vec::new();

        for record in records {
            let reporter_desc = record
                .reporter_desc
                .clone()
                .unwrap_or_else(|| unit.reporter_name.clone());
            let partner_desc = record
                .partner_desc
                .clone()
                .unwrap_or_else(|| unit.partner_name.clone());

            let reporter = self.locate(record.reporter_iso3.as_deref(), &reporter_desc);
            let partner = self.locate(record.partner_iso3.as_deref(), &partner_desc);
            let (Some(reporter), Some(partner)) = (reporter, partner) else {
                continue;
            };

            features.push(FlowFeature {
                kind: "Feature",
                geometry: LineGeometry::new(partner, reporter),
                properties: FlowProperties {
                    reporter_name: reporter_desc.clone(),
                    partner_name: partner_desc.clone(),
                    trade_value: record.primary_value,
                    net_weight: record.net_weight.unwrap_or(0.0),
                    quantity: record.quantity.unwrap_or(0.0),
                    item: unit.item.clone(),
                    year: unit.year,
                    flow_direction: format!("{partner_desc} → {reporter_desc}"),
                },
            });
        }

        let processed = features.len();
        FlowCollection {
            kind: "FeatureCollection",
            metadata: FlowMetadata {
                item: unit.item.clone(),
                year: unit.year,
                reporter: unit.reporter_name.clone(),
                partner: unit.partner_name.clone(),
                total_flows: processed,
                processed_records: processed,
                total_records: records.len(),
                created_at: Utc::now().to_rfc3339(),
            },
            features,
        }
    }

    /// ISO-3 code first, display name as fallback
    fn locate(&self, iso3: Option<&str>, name: &str) -> Option<&CoordinateEntry> {
        iso3.and_then(|code| self.resolver.resolve(code))
            .or_else(|| self.resolver.resolve(name))
    }
}
