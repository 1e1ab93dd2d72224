//! Tabular record types: frequencies, coordinates and map rows.

use serde::{Deserialize, Serialize};

/// One row of the frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    /// Canonical location name
    #[serde(rename = "loc")]
    pub name: String,

    /// Number of mentions (always >= 1)
    pub count: u64,
}

impl FrequencyRecord {
    /// Create a new frequency record.
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Sum the counts of a frequency table.
pub fn total_count(records: &[FrequencyRecord]) -> u64 {
    records.iter().map(|r| r.count).sum()
}

/// A resolved coordinate for a canonical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,

    /// Human-readable address reported by the geocoder, if any
    pub address: Option<String>,
}

impl GeoPoint {
    /// Create a point without an address.
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            address: None,
        }
    }

    /// Attach the geocoder's address string.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Check that the coordinates are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        valid_coordinates(self.lat, self.lon)
    }
}

fn valid_coordinates(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

/// A joined frequency + coordinate row, consumed by renderers.
///
/// This is also the row type of the coordinate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    #[serde(rename = "loc")]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub count: u64,
    #[serde(default)]
    pub address: Option<String>,
}

impl MapPoint {
    /// Join a frequency record with its resolved point.
    pub fn join(record: &FrequencyRecord, point: GeoPoint) -> Self {
        Self {
            name: record.name.clone(),
            lat: point.lat,
            lon: point.lon,
            count: record.count,
            address: point.address,
        }
    }

    /// Check that the coordinates are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        valid_coordinates(self.lat, self.lon)
    }
}
