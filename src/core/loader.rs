use crate::domain::model::{Feature, FeatureCollection, LatLng, RejectedRecord};
use crate::utils::error::{LocatorError, Result};
use serde_json::Value;
use std::collections::HashSet;

/// A feed record that passed validation but has no marker yet.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRecord {
    pub source_index: usize,
    pub name: String,
    pub description: String,
    pub timing: String,
    pub location: LatLng,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub records: Vec<StoreRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Decode the raw feed bytes into a feature collection.
pub fn parse_feed(bytes: &[u8]) -> Result<FeatureCollection> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LocatorError::FeedFormatError {
            message: "feed is empty".to_string(),
        });
    }

    let collection: FeatureCollection = serde_json::from_slice(bytes)?;
    if let Some(kind) = collection.kind.as_deref() {
        if kind != "FeatureCollection" {
            return Err(LocatorError::FeedFormatError {
                message: format!("expected a FeatureCollection, got '{}'", kind),
            });
        }
    }
    Ok(collection)
}

/// Validate every feature, keeping source order. Malformed features are
/// rejected individually and never stop the remaining ones.
pub fn parse_records(collection: &FeatureCollection) -> ParsedFeed {
    let mut parsed = ParsedFeed::default();
    let mut seen_names = HashSet::new();

    for (index, raw) in collection.features.iter().enumerate() {
        match record_from_feature(index, raw) {
            Ok(record) => {
                if !seen_names.insert(record.name.clone()) {
                    tracing::warn!(
                        "⚠️ Duplicate store name '{}' at record #{}, keeping both",
                        record.name,
                        index
                    );
                }
                parsed.records.push(record);
            }
            Err(rejected) => {
                tracing::warn!("⚠️ Skipping record #{}: {}", rejected.index, rejected.reason);
                parsed.rejected.push(rejected);
            }
        }
    }

    parsed
}

/// Validate one feature. Only geometry and name can reject a record.
pub fn record_from_feature(
    index: usize,
    raw: &Value,
) -> std::result::Result<StoreRecord, RejectedRecord> {
    let reject = |reason: String| RejectedRecord::new(index, reason);

    let geometry = raw
        .get("geometry")
        .filter(|g| !g.is_null())
        .ok_or_else(|| reject("missing geometry".to_string()))?;
    if geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .is_none()
    {
        return Err(reject("missing coordinates".to_string()));
    }

    let feature: Feature =
        serde_json::from_value(raw.clone()).map_err(|e| reject(e.to_string()))?;

    // 座標順序是 [經度, 緯度]
    let coordinates = &feature.geometry.coordinates;
    if coordinates.len() < 2 {
        return Err(reject(format!(
            "expected [longitude, latitude], got {} value(s)",
            coordinates.len()
        )));
    }
    let location = LatLng::new(coordinates[1], coordinates[0]);
    if !location.is_valid() {
        return Err(reject(format!(
            "coordinates out of range: [{}, {}]",
            coordinates[0], coordinates[1]
        )));
    }

    let name = feature.properties.name.trim();
    if name.is_empty() {
        return Err(reject("store name is empty".to_string()));
    }

    Ok(StoreRecord {
        source_index: index,
        name: name.to_string(),
        description: feature.properties.description,
        timing: feature.properties.timing,
        location,
    })
}
