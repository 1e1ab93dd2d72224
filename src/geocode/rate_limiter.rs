//! Minimum-delay rate limiting and retries for geocoding calls.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use log::{trace, warn};

use super::Geocoder;
use crate::error::Result;
use crate::model::GeoPoint;

/// Rate limiter that enforces a minimum delay between calls.
#[derive(Debug)]
pub struct RateLimiter {
    min_delay: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a rate limiter with the given minimum delay.
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_call: Mutex::new(None),
        }
    }

    /// Create a rate limiter from milliseconds.
    pub fn from_millis(min_delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_delay_ms))
    }

    /// Get the minimum delay.
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Block until the minimum delay since the previous call has passed.
    ///
    /// The first call never waits.
    pub fn wait(&self) {
        let mut last = self
            .last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_delay {
                let pause = self.min_delay - elapsed;
                trace!("Rate limiter sleeping for {:?}", pause);
                thread::sleep(pause);
            }
        }
        *last = Some(Instant::now());
    }
}

/// Retries after a failed call, by default.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Pause after a failed call before retrying, by default.
pub const DEFAULT_ERROR_WAIT: Duration = Duration::from_secs(5);

/// A geocoder wrapper that serializes calls through a [`RateLimiter`].
///
/// A failed call is retried up to `max_retries` times, pausing `error_wait`
/// before each retry. The error of the last attempt is returned.
#[derive(Debug)]
pub struct RateLimited<G> {
    inner: G,
    limiter: RateLimiter,
    max_retries: u32,
    error_wait: Duration,
}

impl<G: Geocoder> RateLimited<G> {
    /// Wrap a geocoder with a minimum delay between calls.
    pub fn new(inner: G, min_delay: Duration) -> Self {
        Self {
            inner,
            limiter: RateLimiter::new(min_delay),
            max_retries: DEFAULT_MAX_RETRIES,
            error_wait: DEFAULT_ERROR_WAIT,
        }
    }

    /// Set how often a failed call is retried and how long to pause first.
    pub fn with_retries(mut self, max_retries: u32, error_wait: Duration) -> Self {
        self.max_retries = max_retries;
        self.error_wait = error_wait;
        self
    }

    /// Get the retry count.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the wrapped geocoder.
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Geocoder> Geocoder for RateLimited<G> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn geocode(&self, query: &str) -> Result<Option<GeoPoint>> {
        let mut attempt = 0;
        loop {
            self.limiter.wait();
            match self.inner.geocode(query) {
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Geocoding '{}' failed ({}), retry {} of {} in {:?}",
                        query, e, attempt, self.max_retries, self.error_wait
                    );
                    thread::sleep(self.error_wait);
                }
                result => return result,
            }
        }
    }
}
