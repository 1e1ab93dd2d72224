//! Letter markup extraction.

mod corpus;
mod options;
mod xml;

pub use corpus::{check_unique_ids, extract_dir, list_files, read_text_exports, write_text_exports};
pub use options::{ErrorMode, ExtractOptions};
pub use xml::XmlExtractor;
