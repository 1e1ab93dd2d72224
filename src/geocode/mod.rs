//! Coordinate resolution for canonical names.
//!
//! Geocoding is delegated to an external service behind the [`Geocoder`]
//! trait. Calls are strictly sequential; [`RateLimited`] adds the minimum
//! delay public services ask for.

mod nominatim;
mod rate_limiter;

pub use nominatim::{NominatimGeocoder, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
pub use rate_limiter::{RateLimited, RateLimiter, DEFAULT_ERROR_WAIT, DEFAULT_MAX_RETRIES};

use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::ErrorMode;
use crate::model::{total_count, FrequencyRecord, GeoPoint, MapPoint};

/// Trait for geocoding backends.
pub trait Geocoder: Send + Sync {
    /// Get the name of this geocoder.
    fn name(&self) -> &str;

    /// Resolve a place name. `Ok(None)` means the name is unknown.
    fn geocode(&self, query: &str) -> Result<Option<GeoPoint>>;
}

/// Options for building the default geocoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeOptions {
    /// Nominatim base URL
    pub endpoint: String,

    /// User-Agent sent with every request
    pub user_agent: String,

    /// Preferred address language
    pub language: String,

    /// Minimum delay between two requests
    pub min_delay: Duration,

    /// Retries after a failed request
    pub max_retries: u32,

    /// Pause before each retry
    pub error_wait: Duration,

    /// How service errors are handled
    pub error_mode: ErrorMode,
}

impl Default for GeocodeOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            language: "en".to_string(),
            min_delay: Duration::from_secs(1),
            max_retries: DEFAULT_MAX_RETRIES,
            error_wait: DEFAULT_ERROR_WAIT,
            error_mode: ErrorMode::Strict,
        }
    }
}

impl GeocodeOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different Nominatim instance.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the preferred address language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the minimum delay between requests.
    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    /// Set the retry count and the pause before each retry.
    pub fn with_retries(mut self, max_retries: u32, error_wait: Duration) -> Self {
        self.max_retries = max_retries;
        self.error_wait = error_wait;
        self
    }

    /// Set the error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Build a rate-limited Nominatim geocoder from these options.
    pub fn build(&self) -> Result<RateLimited<NominatimGeocoder>> {
        let geocoder = NominatimGeocoder::with_endpoint(self.endpoint.as_str(), &self.user_agent)?
            .with_language(self.language.as_str());
        Ok(RateLimited::new(geocoder, self.min_delay)
            .with_retries(self.max_retries, self.error_wait))
    }
}

/// Result of geocoding a frequency table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodeOutcome {
    /// Resolved names joined with their counts, in input order
    pub points: Vec<MapPoint>,

    /// Records whose name could not be resolved
    pub unresolved: Vec<FrequencyRecord>,
}

impl GeocodeOutcome {
    /// Total count of the resolved (renderable) subset.
    pub fn rendered_total(&self) -> u64 {
        self.points.iter().map(|p| p.count).sum()
    }

    /// Total count lost to unresolved names.
    pub fn unresolved_total(&self) -> u64 {
        total_count(&self.unresolved)
    }
}

/// Geocode every record of a frequency table in order.
///
/// Unknown names end up in [`GeocodeOutcome::unresolved`]. Service errors
/// propagate in strict mode; in lenient mode they are logged and the name is
/// treated as unresolved. Retries are the geocoder's concern, see
/// [`RateLimited::with_retries`]. `on_record` is called after each lookup.
pub fn geocode_records<G, F>(
    geocoder: &G,
    records: &[FrequencyRecord],
    error_mode: ErrorMode,
    mut on_record: F,
) -> Result<GeocodeOutcome>
where
    G: Geocoder + ?Sized,
    F: FnMut(&FrequencyRecord, Option<&GeoPoint>),
{
    let mut outcome = GeocodeOutcome::default();

    for record in records {
        let point = match geocoder.geocode(&record.name) {
            Ok(point) => point,
            Err(e) if error_mode == ErrorMode::Lenient => {
                warn!("Geocoding '{}' failed: {}", record.name, e);
                None
            }
            Err(e) => return Err(e),
        };

        on_record(record, point.as_ref());
        match point {
            Some(point) => outcome.points.push(MapPoint::join(record, point)),
            None => {
                warn!("No coordinates for '{}'", record.name);
                outcome.unresolved.push(record.clone());
            }
        }
    }

    info!(
        "Geocoder '{}' resolved {} of {} names ({} of {} mentions)",
        geocoder.name(),
        outcome.points.len(),
        records.len(),
        outcome.rendered_total(),
        total_count(records)
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    struct TableGeocoder(HashMap<&'static str, (f64, f64)>);

    impl Geocoder for TableGeocoder {
        fn name(&self) -> &str {
            "table"
        }

        fn geocode(&self, query: &str) -> Result<Option<GeoPoint>> {
            if query == "Offline" {
                return Err(Error::Http("connection refused".into()));
            }
            Ok(self
                .0
                .get(query)
                .map(|&(lat, lon)| GeoPoint::new(query, lat, lon)))
        }
    }

    fn geocoder() -> TableGeocoder {
        TableGeocoder(HashMap::from([("Rom", (41.89, 12.48)), ("Dresden", (51.05, 13.74))]))
    }

    #[test]
    fn test_options_builder() {
        let options = GeocodeOptions::new()
            .with_endpoint("http://localhost:8080")
            .with_min_delay(Duration::ZERO)
            .with_error_mode(ErrorMode::Lenient);
        assert_eq!(options.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(options.min_delay, Duration::ZERO);
        assert_eq!(GeocodeOptions::default().min_delay, Duration::from_secs(1));
        assert_eq!(options.max_retries, 2);
        assert_eq!(options.error_wait, Duration::from_secs(5));

        let geocoder = options.with_retries(0, Duration::ZERO).build().unwrap();
        assert_eq!(geocoder.name(), "nominatim");
        assert_eq!(geocoder.max_retries(), 0);
    }

    #[test]
    fn test_unresolved_names_are_skipped() {
        let records = vec![
            FrequencyRecord::new("Dresden", 4),
            FrequencyRecord::new("Atlantis", 2),
            FrequencyRecord::new("Rom", 3),
        ];

        let outcome = geocode_records(&geocoder(), &records, ErrorMode::Strict, |_, _| {}).unwrap();
        assert_eq!(outcome.points.len(), 2);
        assert_eq!(outcome.unresolved, vec![FrequencyRecord::new("Atlantis", 2)]);
        assert_eq!(outcome.rendered_total(), 7);
        assert_eq!(outcome.unresolved_total(), 2);
    }

    #[test]
    fn test_strict_mode_propagates_errors() {
        let records = vec![FrequencyRecord::new("Offline", 1)];
        let result = geocode_records(&geocoder(), &records, ErrorMode::Strict, |_, _| {});
        assert!(matches!(result, Err(Error::Http(_))));
    }

    #[test]
    fn test_lenient_mode_skips_errors() {
        let records = vec![FrequencyRecord::new("Offline", 1), FrequencyRecord::new("Rom", 1)];
        let mut seen = Vec::new();
        let outcome = geocode_records(&geocoder(), &records, ErrorMode::Lenient, |r, p| {
            seen.push((r.name.clone(), p.is_some()))
        })
        .unwrap();

        assert_eq!(outcome.points.len(), 1);
        assert_eq!(outcome.unresolved.len(), 1);
        assert_eq!(seen, vec![("Offline".to_string(), false), ("Rom".to_string(), true)]);
    }
}
