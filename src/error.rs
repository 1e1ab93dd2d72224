//! Error types for the letterloc library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for letterloc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while running the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required input file or directory does not exist.
    #[error("Missing input: {}", .0.display())]
    MissingInput(PathBuf),

    /// The document markup could not be parsed.
    #[error("Markup parsing error: {0}")]
    Xml(String),

    /// Error reading or writing a CSV table.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error encoding or decoding JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The entity tagger returned an unusable response.
    #[error("Tagger error: {0}")]
    Tagger(String),

    /// The geocoding service returned an unusable response.
    #[error("Geocoding error: {0}")]
    Geocode(String),

    /// A table row is missing a field or holds an invalid value.
    #[error("Invalid record at {location}: {reason}")]
    InvalidRecord {
        /// File and line of the offending row
        location: String,
        /// What was wrong with it
        reason: String,
    },

    /// Error while rendering a map artifact.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn invalid_record(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidRecord {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            _ => Error::Xml(err.to_string()),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(e) => Error::Io(e),
                other => Error::Csv(format!("{:?}", other)),
            }
        } else {
            Error::Csv(err.to_string())
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}
