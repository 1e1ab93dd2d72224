//! Paragraph text extraction from letter markup.

use std::fs;
use std::path::Path;

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use unicode_normalization::UnicodeNormalization;

use super::ExtractOptions;
use crate::error::{Error, Result};
use crate::model::{document_id, Document};

/// Markup-to-text extractor.
///
/// Only the text inside paragraph elements is kept. Each paragraph is
/// trimmed and stripped of line breaks, then the paragraphs are
/// concatenated without a separator.
#[derive(Debug, Clone, Default)]
pub struct XmlExtractor {
    options: ExtractOptions,
}

impl XmlExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Get the extractor options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract a document from a markup file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let markup = fs::read_to_string(path)?;
        self.extract_str(document_id(path), &markup)
            .map_err(|e| match e {
                Error::Xml(msg) => Error::Xml(format!("{}: {}", path.display(), msg)),
                other => other,
            })
    }

    /// Extract a document from an in-memory markup string.
    pub fn extract_str(&self, id: impl Into<String>, markup: &str) -> Result<Document> {
        let id = id.into();
        let paragraphs = self.paragraphs(markup)?;
        let mut plain_text: String = paragraphs.concat();
        if self.options.normalize_unicode {
            plain_text = plain_text.nfc().collect();
        }

        debug!(
            "Extracted {} paragraphs ({} chars) from {}",
            paragraphs.len(),
            plain_text.len(),
            id
        );

        Ok(Document {
            id,
            raw_markup: if self.options.keep_markup {
                markup.to_string()
            } else {
                String::new()
            },
            plain_text,
            paragraph_count: paragraphs.len(),
        })
    }

    /// Collect the cleaned text of every outermost paragraph.
    pub fn paragraphs(&self, markup: &str) -> Result<Vec<String>> {
        let para = self.options.paragraph_element.as_bytes();
        let mut reader = Reader::from_str(markup);

        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;
        let mut excluded_depth = 0usize;
        let mut para_depth = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::Xml(format!("at byte {}: {}", reader.error_position(), e))
            })?;

            match event {
                Event::Start(e) => {
                    depth += 1;
                    let name = e.local_name();
                    if excluded_depth > 0 || self.options.is_excluded(name.as_ref()) {
                        excluded_depth += 1;
                    } else if name.as_ref() == para {
                        para_depth += 1;
                    }
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if excluded_depth > 0 {
                        excluded_depth -= 1;
                    } else if e.local_name().as_ref() == para && para_depth > 0 {
                        para_depth -= 1;
                        if para_depth == 0 {
                            paragraphs.push(clean_paragraph(&current));
                            current.clear();
                        }
                    }
                }
                Event::Empty(e) => {
                    // <p/> is an empty paragraph
                    if excluded_depth == 0
                        && para_depth == 0
                        && e.local_name().as_ref() == para
                    {
                        paragraphs.push(String::new());
                    }
                }
                Event::Text(t) => {
                    if excluded_depth == 0 && para_depth > 0 {
                        let text = t.unescape().map_err(|e| {
                            Error::Xml(format!("at byte {}: {}", reader.buffer_position(), e))
                        })?;
                        current.push_str(&text);
                    }
                }
                Event::CData(c) => {
                    if excluded_depth == 0 && para_depth > 0 {
                        current.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth > 0 {
            return Err(Error::Xml(format!(
                "unexpected end of document with {} unclosed element(s)",
                depth
            )));
        }

        Ok(paragraphs)
    }
}

fn clean_paragraph(text: &str) -> String {
    text.trim().replace(['\n', '\r'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <text>
    <body>
      <div type="letter">
        <opener>
          <address><addrLine><p>Hr. Boghandler Hegel, Kjøbenhavn</p></addrLine></address>
        </opener>
        <p>
          Kjære Hegel! Jeg reiser til <placeName>Dresden</placeName> imorgen.
        </p>
        <p>Hilsen fra <hi rend="italic">Rom</hi> &amp; Sorrento.</p>
      </div>
    </body>
  </text>
</TEI>"#;

    #[test]
    fn test_extract_paragraphs() {
        let extractor = XmlExtractor::new();
        let paragraphs = extractor.paragraphs(LETTER).unwrap();

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0], "Kjære Hegel! Jeg reiser til Dresden imorgen.");
        assert_eq!(paragraphs[1], "Hilsen fra Rom & Sorrento.");
    }

    #[test]
    fn test_address_is_excluded() {
        let doc = XmlExtractor::new().extract_str("B1", LETTER).unwrap();
        assert!(!doc.plain_text.contains("Boghandler"));
        assert_eq!(doc.paragraph_count, 2);
    }

    #[test]
    fn test_paragraphs_concatenated_without_separator() {
        let doc = XmlExtractor::new().extract_str("B1", LETTER).unwrap();
        assert_eq!(
            doc.plain_text,
            "Kjære Hegel! Jeg reiser til Dresden imorgen.Hilsen fra Rom & Sorrento."
        );
    }

    #[test]
    fn test_nested_paragraph_counted_once() {
        let markup = "<body><p>Ude <p>i</p> Berlin</p></body>";
        let paragraphs = XmlExtractor::new().paragraphs(markup).unwrap();
        assert_eq!(paragraphs, vec!["Ude i Berlin".to_string()]);
    }

    #[test]
    fn test_cdata_and_empty_paragraph() {
        let markup = "<body><p/><p><![CDATA[Wien & Prag]]></p></body>";
        let paragraphs = XmlExtractor::new().paragraphs(markup).unwrap();
        assert_eq!(paragraphs, vec![String::new(), "Wien & Prag".to_string()]);
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        let result = XmlExtractor::new().extract_str("bad", "<body><p>Paris</div></body>");
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_unclosed_element_is_error() {
        let result = XmlExtractor::new().extract_str("bad", "<body><p>Paris</p>");
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_unicode_is_nfc() {
        // "a" followed by a combining ring above
        let markup = "<p>Aa\u{30A}rhus</p>";
        let doc = XmlExtractor::new().extract_str("nfc", markup).unwrap();
        assert_eq!(doc.plain_text, "A\u{E5}rhus");
    }

    #[test]
    fn test_markup_not_kept() {
        let extractor = XmlExtractor::with_options(ExtractOptions::new().with_markup(false));
        let doc = extractor.extract_str("B1", "<p>Bergen</p>").unwrap();
        assert!(doc.raw_markup.is_empty());
        assert_eq!(doc.plain_text, "Bergen");
    }

    #[test]
    fn test_missing_file() {
        let result = XmlExtractor::new().extract_file("does/not/exist.xml");
        assert!(matches!(result, Err(Error::MissingInput(_))));
    }
}
