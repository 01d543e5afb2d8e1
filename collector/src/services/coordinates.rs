//! Country centroid resolver built from a reference GeoJSON dataset
//!
//! Loads a FeatureCollection of country features once per run, derives an
//! area-weighted centroid per feature and indexes it under both the ISO-3
//! code and the display name. A fixed table of Comtrade-specific alternate
//! spellings is layered on top afterwards. The finished index is read-only
//! for the rest of the run.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{CollectorError, CollectorResult};
use crate::types::CoordinateEntry;

/// Alternate spellings used by the trade API, each pointing at its canonical
/// reference-dataset name (first candidate that exists wins). An alias whose
/// canonical target is missing is silently omitted.
const COMTRADE_ALIASES: &[(&str, &[&str])] = &[
    ("Rep. of Korea", &["South Korea", "Korea"]),
    ("China, Hong Kong SAR", &["Hong Kong"]),
    ("China, Macao SAR", &["Macao"]),
    ("United States of America", &["United States of America"]),
    ("Russian Federation", &["Russia"]),
    ("United Kingdom", &["United Kingdom"]),
    ("Viet Nam", &["Vietnam"]),
    ("Iran (Islamic Rep. of)", &["Iran"]),
    ("Venezuela (Boliv. Rep. of)", &["Venezuela"]),
    ("Bolivia (Plurin. State of)", &["Bolivia"]),
    ("Tanzania (United Rep. of)", &["Tanzania"]),
    ("Moldova (Rep. of)", &["Moldova"]),
    ("Macedonia (North)", &["North Macedonia"]),
    ("Czechia", &["Czech Rep.", "Czech Republic"]),
    ("Türkiye", &["Turkey"]),
];

/// In-memory lookup from country identifier to centroid coordinate
pub struct CoordinateResolver {
    entries: HashMap<String, CoordinateEntry>,
}

impl CoordinateResolver {
    /// Load and index the reference dataset from disk
    pub async fn load(path: &Path) -> CollectorResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CollectorError::Reference {
                message: format!("cannot read {}: {e}", path.display()),
            }
        })?;
        let doc: Value = serde_json::from_str(&content).map_err(|e| CollectorError::Reference {
            message: format!("{} is not valid JSON: {e}", path.display()),
        })?;
        Self::from_geojson(&doc)
    }

    /// Build the index from an already-parsed GeoJSON document
    pub fn from_geojson(doc: &Value) -> CollectorResult<Self> {
        let features = doc
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| CollectorError::Reference {
                message: "reference data is not a GeoJSON FeatureCollection".to_string(),
            })?;

        let mut entries = HashMap::new();
        for feature in features {
            let properties = feature.get("properties");
            let name = property_string(properties, &["name", "NAME", "ADMIN", "admin"]);
            let iso3 = property_string(properties, &["iso_a3", "ISO_A3", "adm0_a3", "ADM0_A3"])
                // Natural Earth marks disputed territories with -99
                .filter(|code| code != "-99");

            let Some((lon, lat)) = geometry_centroid(feature.get("geometry")) else {
                continue;
            };
            let Some(display_name) = name.clone().or_else(|| iso3.clone()) else {
                continue;
            };

            let entry = CoordinateEntry {
                name: display_name,
                lon,
                lat,
            };
            if let Some(iso3) = iso3 {
                entries.insert(iso3, entry.clone());
            }
            if let Some(name) = name {
                entries.insert(name, entry);
            }
        }

        for (alias, canonicals) in COMTRADE_ALIASES {
            let canonical = canonicals.iter().find_map(|key| entries.get(*key)).cloned();
            if let Some(entry) = canonical {
                entries.insert(alias.to_string(), entry);
            }
        }

        Ok(Self { entries })
    }

    /// Resolve an ISO-3 code or display name to a centroid
    pub fn resolve(&self, key: &str) -> Option<&CoordinateEntry> {
        self.entries.get(key)
    }

    /// Number of indexed keys (codes, names and aliases)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First candidate key whose value in `properties` is a string
fn property_string(properties: Option<&Value>, candidates: &[&str]) -> Option<String> {
    let properties = properties?.as_object()?;
    candidates
        .iter()
        .find_map(|key| properties.get(*key)?.as_str())
        .map(str::to_string)
}

/// Centroid of a GeoJSON geometry
///
/// Points pass through; Polygon and MultiPolygon centroids are computed from
/// the exterior rings, weighting each polygon by its absolute area. Holes
/// are ignored; at country scale they shift centroids negligibly.
fn geometry_centroid(geometry: Option<&Value>) -> Option<(f64, f64)> {
    let geometry = geometry?.as_object()?;
    let kind = geometry.get("type")?.as_str()?;
    let coordinates = geometry.get("coordinates")?;

    match kind {
        "Point" => {
            let point = coordinates.as_array()?;
            Some((point.first()?.as_f64()?, point.get(1)?.as_f64()?))
        }
        "Polygon" => {
            let exterior = coordinates.as_array()?.first()?;
            let (cx, cy, _) = ring_centroid(exterior.as_array()?)?;
            Some((cx, cy))
        }
        "MultiPolygon" => {
            let mut weighted_x = 0.0;
            let mut weighted_y = 0.0;
            let mut total_area = 0.0;
            for polygon in coordinates.as_array()? {
                let Some(exterior) = polygon.as_array().and_then(|rings| rings.first()) else {
                    continue;
                };
                let Some((cx, cy, area)) = exterior.as_array().and_then(|r| ring_centroid(r))
                else {
                    continue;
                };
                weighted_x += cx * area;
                weighted_y += cy * area;
                total_area += area;
            }
            if total_area > 0.0 {
                Some((weighted_x / total_area, weighted_y / total_area))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Shoelace centroid of one ring, returning (cx, cy, |area|)
///
/// Degenerate rings (fewer than 3 distinct vertices, or zero area) fall back
/// to the vertex average with a tiny weight so they still contribute.
fn ring_centroid(ring: &[Value]) -> Option<(f64, f64, f64)> {
    let vertices: Vec<(f64, f64)> = ring
        .iter()
        .filter_map(|point| {
            let point = point.as_array()?;
            Some((point.first()?.as_f64()?, point.get(1)?.as_f64()?))
        })
        .collect();
    if vertices.is_empty() {
        return None;
    }

    let mut signed_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..vertices.len() {
        let (x0, y0) = vertices[i];
        let (x1, y1) = vertices[(i + 1) % vertices.len()];
        let cross = x0 * y1 - x1 * y0;
        signed_area += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    signed_area /= 2.0;

    if signed_area.abs() < f64::EPSILON {
        let n = vertices.len() as f64;
        let (sx, sy) = vertices
            .iter()
            .fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
        return Some((sx / n, sy / n, f64::EPSILON));
    }

    Some((
        cx / (6.0 * signed_area),
        cy / (6.0 * signed_area),
        signed_area.abs(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_doc() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "South Korea", "iso_a3": "KOR" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[
                            [126.0, 35.0], [130.0, 35.0], [130.0, 39.0],
                            [126.0, 39.0], [126.0, 35.0]
                        ]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Japan", "iso_a3": "JPN" },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[138.0, 34.0], [142.0, 34.0], [142.0, 38.0],
                              [138.0, 38.0], [138.0, 34.0]]],
                            [[[130.0, 31.0], [132.0, 31.0], [132.0, 33.0],
                              [130.0, 33.0], [130.0, 31.0]]]
                        ]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Singapore", "iso_a3": "SGP" },
                    "geometry": { "type": "Point", "coordinates": [103.8, 1.35] }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Kosovo", "iso_a3": "-99" },
                    "geometry": { "type": "Point", "coordinates": [20.9, 42.6] }
                }
            ]
        })
    }

    #[test]
    fn polygon_centroid_lands_in_the_middle() {
        let resolver = CoordinateResolver::from_geojson(&reference_doc()).unwrap();
        let korea = resolver.resolve("KOR").unwrap();
        assert!((korea.lon - 128.0).abs() < 1e-9);
        assert!((korea.lat - 37.0).abs() < 1e-9);
    }

    #[test]
    fn multipolygon_centroid_is_area_weighted() {
        let resolver = CoordinateResolver::from_geojson(&reference_doc()).unwrap();
        let japan = resolver.resolve("JPN").unwrap();
        // Large square (area 16) at (140,36), small square (area 4) at (131,32)
        assert!((japan.lon - 138.2).abs() < 1e-9);
        assert!((japan.lat - 35.2).abs() < 1e-9);
    }

    #[test]
    fn point_features_pass_through() {
        let resolver = CoordinateResolver::from_geojson(&reference_doc()).unwrap();
        let sg = resolver.resolve("Singapore").unwrap();
        assert_eq!((sg.lon, sg.lat), (103.8, 1.35));
    }

    #[test]
    fn iso_and_name_share_one_entry() {
        let resolver = CoordinateResolver::from_geojson(&reference_doc()).unwrap();
        assert_eq!(resolver.resolve("KOR"), resolver.resolve("South Korea"));
    }

    #[test]
    fn alias_is_added_only_when_canonical_exists() {
        let resolver = CoordinateResolver::from_geojson(&reference_doc()).unwrap();
        // South Korea is present, so the Comtrade long form resolves
        assert_eq!(
            resolver.resolve("Rep. of Korea"),
            resolver.resolve("South Korea")
        );
        // Russia is absent from the fixture, so its alias is omitted
        assert!(resolver.resolve("Russian Federation").is_none());
    }

    #[test]
    fn disputed_iso_marker_is_not_indexed() {
        let resolver = CoordinateResolver::from_geojson(&reference_doc()).unwrap();
        assert!(resolver.resolve("-99").is_none());
        assert!(resolver.resolve("Kosovo").is_some());
    }

    #[test]
    fn non_feature_collection_is_an_error() {
        let result = CoordinateResolver::from_geojson(&json!({ "type": "Polygon" }));
        assert!(matches!(
            result,
            Err(CollectorError::Reference { .. })
        ));
    }
}
