//! Location name normalization.
//!
//! Raw tagger output is noisy: genitive forms, historic spellings and
//! tokens that are not places at all. The normalizer reduces it to a set of
//! canonical names suitable for counting and geocoding.
//!
//! # Example
//!
//! ```
//! use letterloc::model::Mention;
//! use letterloc::normalize::LocationNormalizer;
//!
//! let normalizer = LocationNormalizer::new();
//! let mentions = vec![
//!     Mention::new("B1", "Paris"),
//!     Mention::new("B1", "Danmarks"),
//!     Mention::new("B1", "Kjøbenhavn"),
//! ];
//! let result = normalizer.normalize(&mentions);
//! let names: Vec<_> = result.canonical_names().collect();
//! assert_eq!(names, vec!["Paris", "Danmark", "København"]);
//! ```

mod fuzzy;
mod normalizer;
mod options;

pub use fuzzy::{similarity, FuzzyCorrector};
pub use normalizer::{LocationNormalizer, Normalization};
pub use options::{
    NormalizeOptions, TieBreak, DEFAULT_EXCLUSIONS, DEFAULT_KEEP_SUFFIX, DEFAULT_REFERENCES,
    DEFAULT_THRESHOLD,
};
