//! Tagger backed by a remote NER model service.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::EntityTagger;
use crate::error::{Error, Result};

const DEFAULT_LABEL: &str = "LOC";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct TagRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TagResponse {
    #[serde(alias = "ents")]
    entities: Vec<TaggedSpan>,
}

#[derive(Deserialize)]
struct TaggedSpan {
    text: String,
    label: String,
}

/// Sends each document to an NER service and keeps the location spans.
///
/// The service receives `{"text": "..."}` and answers with
/// `{"entities": [{"text": "...", "label": "LOC"}, ...]}`. The model itself
/// stays loaded in the service for the lifetime of the batch.
#[derive(Debug, Clone)]
pub struct HttpTagger {
    client: Client,
    endpoint: String,
    label: String,
}

impl HttpTagger {
    /// Create a tagger for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a tagger with a custom request timeout.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            label: DEFAULT_LABEL.to_string(),
        })
    }

    /// Set the entity label treated as a location.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Parse a service response body and keep spans with the location label.
    pub fn parse_response(&self, body: &str) -> Result<Vec<String>> {
        let response: TagResponse = serde_json::from_str(body)
            .map_err(|e| Error::Tagger(format!("unexpected response from {}: {}", self.endpoint, e)))?;

        Ok(response
            .entities
            .into_iter()
            .filter(|span| span.label == self.label)
            .map(|span| span.text)
            .collect())
    }
}

impl EntityTagger for HttpTagger {
    fn name(&self) -> &str {
        "http"
    }

    fn tag(&self, text: &str) -> Result<Vec<String>> {
        let body = self
            .client
            .post(&self.endpoint)
            .json(&TagRequest { text })
            .send()?
            .error_for_status()?
            .text()?;

        let spans = self.parse_response(&body)?;
        debug!("{} returned {} '{}' spans", self.endpoint, spans.len(), self.label);
        Ok(spans)
    }
}
