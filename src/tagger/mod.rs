//! Location entity tagging.
//!
//! The tagger is the one stage that depends on an NLP model. It is modelled
//! as a trait object that is constructed once by the caller, passed into the
//! stage and dropped afterwards, so no model state lives in globals.
//!
//! # Example
//!
//! ```
//! use letterloc::model::Document;
//! use letterloc::tagger::{tag_documents, GazetteerTagger};
//!
//! let tagger = GazetteerTagger::new(["Paris", "Danmark"]).unwrap();
//! let docs = vec![Document::from_text("B1", "Fra Paris til Danmarks hovedstad.")];
//! let mentions = tag_documents(&tagger, &docs).unwrap();
//! assert_eq!(mentions.len(), 2);
//! ```

mod gazetteer;
mod http;

pub use gazetteer::GazetteerTagger;
pub use http::HttpTagger;

use log::info;

use crate::error::Result;
use crate::model::{Document, Mention};

/// Trait for location entity taggers.
///
/// Implement this trait to plug in another NER backend.
pub trait EntityTagger: Send + Sync {
    /// Get the name of this tagger.
    fn name(&self) -> &str;

    /// Return the location mentions found in `text`, in document order.
    fn tag(&self, text: &str) -> Result<Vec<String>>;

    /// Tag a document and attach its id to every mention.
    fn tag_document(&self, doc: &Document) -> Result<Vec<Mention>> {
        Ok(self
            .tag(&doc.plain_text)?
            .into_iter()
            .map(|raw| Mention::new(doc.id.clone(), raw))
            .collect())
    }
}

/// Tag every document in order and flatten the mentions.
pub fn tag_documents(tagger: &dyn EntityTagger, documents: &[Document]) -> Result<Vec<Mention>> {
    tag_documents_with_progress(tagger, documents, |_, _| {})
}

/// Tag every document in order, calling `on_document` with each document
/// and its mention count as soon as it is tagged.
pub fn tag_documents_with_progress<F>(
    tagger: &dyn EntityTagger,
    documents: &[Document],
    mut on_document: F,
) -> Result<Vec<Mention>>
where
    F: FnMut(&Document, usize),
{
    let mut mentions = Vec::new();
    for doc in documents {
        let found = tagger.tag_document(doc)?;
        on_document(doc, found.len());
        mentions.extend(found);
    }
    info!(
        "Tagger '{}' found {} mentions in {} documents",
        tagger.name(),
        mentions.len(),
        documents.len()
    );
    Ok(mentions)
}
