use crate::utils::error::LocatorError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Position of a store among the accepted records of a load, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreId(pub usize);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub description: String,
    pub timing: String,
    pub location: LatLng,
}

/// Feature-collection document as served by the store feed.
///
/// Features stay as raw JSON so one malformed entry can be rejected on its own
/// instead of failing the whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub features: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: StoreProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// `[longitude, latitude]`, optionally followed by altitude.
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProperties {
    pub name: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: String,
    #[serde(default, deserialize_with = "optional_text")]
    pub timing: String,
}

/// Free-text property: `null` reads as empty text, numbers and booleans keep
/// their JSON spelling.
fn optional_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: String,
}

impl RejectedRecord {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}

impl From<RejectedRecord> for LocatorError {
    fn from(record: RejectedRecord) -> Self {
        LocatorError::RecordError {
            index: record.index,
            reason: record.reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedRecord>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl LoadReport {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Idle,
    StoreSelected(StoreId),
}

#[derive(Debug, Clone)]
pub enum LoadStatus {
    Pending,
    Ready(LoadReport),
    Failed { message: String },
}

/// A place reported by the autocomplete widget. `location` is absent when the
/// user submits text that the provider could not resolve.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Place {
    pub name: Option<String>,
    pub location: Option<LatLng>,
}

/// One row of the sidebar list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarRow {
    pub id: StoreId,
    pub name: String,
    pub timing: String,
    pub active: bool,
}
