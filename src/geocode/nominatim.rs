//! Nominatim (OpenStreetMap) geocoding adapter.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::Geocoder;
use crate::error::{Error, Result};
use crate::model::GeoPoint;

/// Public Nominatim instance.
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";

/// Default User-Agent; Nominatim's usage policy requires an identifying one.
pub const DEFAULT_USER_AGENT: &str = "letterloc";

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocoder backed by the Nominatim search API.
///
/// This type does not rate-limit itself; wrap it in
/// [`RateLimited`](super::RateLimited) when talking to a public instance.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    language: String,
}

impl NominatimGeocoder {
    /// Create a geocoder for the public instance.
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, user_agent)
    }

    /// Create a geocoder for a custom Nominatim endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            language: "en".to_string(),
        })
    }

    /// Set the preferred language of returned addresses.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Parse a search response for `query`.
    ///
    /// An empty result list means the name could not be resolved.
    pub fn parse_response(query: &str, body: &str) -> Result<Option<GeoPoint>> {
        let places: Vec<Place> = serde_json::from_str(body)
            .map_err(|e| Error::Geocode(format!("unexpected response for '{}': {}", query, e)))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let parse = |value: &str, field: &str| -> Result<f64> {
            value.trim().parse::<f64>().map_err(|_| {
                Error::Geocode(format!("invalid {} '{}' for '{}'", field, value, query))
            })
        };
        let mut point = GeoPoint::new(query, parse(&place.lat, "lat")?, parse(&place.lon, "lon")?);
        point.address = place.display_name;

        if !point.is_valid() {
            return Err(Error::Geocode(format!(
                "coordinates out of range for '{}': {}, {}",
                query, point.lat, point.lon
            )));
        }
        Ok(Some(point))
    }
}

impl Geocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    fn geocode(&self, query: &str) -> Result<Option<GeoPoint>> {
        let url = format!("{}/search", self.endpoint);
        let body = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("accept-language", self.language.as_str()),
            ])
            .send()?
            .error_for_status()?
            .text()?;

        let point = Self::parse_response(query, &body)?;
        debug!(
            "Geocoded '{}': {}",
            query,
            point
                .as_ref()
                .map(|p| format!("{:.4}, {:.4}", p.lat, p.lon))
                .unwrap_or_else(|| "no result".into())
        );
        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r#"[{"place_id": 1, "lat": "51.0493286", "lon": "13.7381437",
                        "display_name": "Dresden, Saxony, Germany"}]"#;
        let point = NominatimGeocoder::parse_response("Dresden", body)
            .unwrap()
            .unwrap();

        assert_eq!(point.name, "Dresden");
        assert!((point.lat - 51.0493286).abs() < 1e-9);
        assert!((point.lon - 13.7381437).abs() < 1e-9);
        assert_eq!(point.address.as_deref(), Some("Dresden, Saxony, Germany"));
    }

    #[test]
    fn test_parse_empty_response() {
        let point = NominatimGeocoder::parse_response("Atlantis", "[]").unwrap();
        assert!(point.is_none());
    }

    #[test]
    fn test_parse_invalid_coordinates() {
        let body = r#"[{"lat": "north", "lon": "10.0"}]"#;
        let result = NominatimGeocoder::parse_response("Bergen", body);
        assert!(matches!(result, Err(Error::Geocode(_))));
    }

    #[test]
    fn test_parse_not_json() {
        let result = NominatimGeocoder::parse_response("Bergen", "Too Many Requests");
        assert!(matches!(result, Err(Error::Geocode(_))));
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let geocoder =
            NominatimGeocoder::with_endpoint("http://localhost:8080/", "letterloc-test").unwrap();
        assert_eq!(geocoder.endpoint, "http://localhost:8080");
    }
}
