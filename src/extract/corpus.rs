//! Directory-level extraction and plain-text exports.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{ErrorMode, XmlExtractor};
use crate::error::{Error, Result};
use crate::model::{document_id, Document};

/// List files with the given extension in a directory, sorted by path.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::MissingInput(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Fail if two files map to the same document id.
///
/// Ids name the text exports and the rows of the entity table, so they must
/// be unique within a corpus.
pub fn check_unique_ids(files: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<String, &Path> = HashMap::with_capacity(files.len());
    for path in files {
        let id = document_id(path);
        if let Some(first) = seen.get(&id) {
            return Err(Error::invalid_record(
                path.display().to_string(),
                format!("document id '{}' is already used by {}", id, first.display()),
            ));
        }
        seen.insert(id, path.as_path());
    }
    Ok(())
}

/// Extract every `*.xml` document in a directory.
///
/// In lenient mode, documents with malformed markup are logged and skipped.
/// Two files with the same document id are an error in either mode.
pub fn extract_dir<P: AsRef<Path>>(dir: P, extractor: &XmlExtractor) -> Result<Vec<Document>> {
    let files = list_files(&dir, "xml")?;
    check_unique_ids(&files)?;
    let mut documents = Vec::with_capacity(files.len());

    for path in &files {
        match extractor.extract_file(path) {
            Ok(doc) => documents.push(doc),
            Err(Error::Xml(msg)) if extractor.options().error_mode == ErrorMode::Lenient => {
                warn!("Skipping malformed document: {}", msg);
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Extracted {} of {} documents from {}",
        documents.len(),
        files.len(),
        dir.as_ref().display()
    );
    Ok(documents)
}

/// Write each document's plain text to `<dir>/<id>.txt`.
///
/// The directory is created if needed. Returns the written paths. Duplicate
/// ids are rejected before anything is written.
pub fn write_text_exports<P: AsRef<Path>>(documents: &[Document], dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let paths: Vec<PathBuf> = documents
        .iter()
        .map(|doc| dir.join(format!("{}.txt", doc.id)))
        .collect();
    check_unique_ids(&paths)?;
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(documents.len());
    for (doc, path) in documents.iter().zip(paths) {
        fs::write(&path, &doc.plain_text)?;
        written.push(path);
    }
    Ok(written)
}

/// Read plain-text exports back as documents.
pub fn read_text_exports<P: AsRef<Path>>(dir: P) -> Result<Vec<Document>> {
    let files = list_files(dir, "txt")?;
    check_unique_ids(&files)?;
    files
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)?;
            Ok(Document::from_text(document_id(path), text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractOptions;

    #[test]
    fn test_extract_dir_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), "<body><p>Bergen</p></body>").unwrap();
        fs::write(dir.path().join("a.xml"), "<body><p>Arendal</p></body>").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let docs = extract_dir(dir.path(), &XmlExtractor::new()).unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_extract_dir_missing() {
        let result = extract_dir("no/such/dir", &XmlExtractor::new());
        assert!(matches!(result, Err(Error::MissingInput(_))));
    }

    #[test]
    fn test_extract_dir_strict_fails_on_malformed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.xml"), "<p>Bergen</p>").unwrap();
        fs::write(dir.path().join("bad.xml"), "<p>Bergen</div>").unwrap();

        let result = extract_dir(dir.path(), &XmlExtractor::new());
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_extract_dir_lenient_skips_malformed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.xml"), "<p>Bergen</p>").unwrap();
        fs::write(dir.path().join("bad.xml"), "<p>Bergen</div>").unwrap();

        let extractor = XmlExtractor::with_options(ExtractOptions::new().lenient());
        let docs = extract_dir(dir.path(), &extractor).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "ok");
    }

    #[test]
    fn test_extract_dir_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("B1.xml"), "<p>Paris</p>").unwrap();
        fs::write(dir.path().join("B1.v2.xml"), "<p>Bergen</p>").unwrap();

        for extractor in [
            XmlExtractor::new(),
            XmlExtractor::with_options(ExtractOptions::new().lenient()),
        ] {
            match extract_dir(dir.path(), &extractor) {
                Err(Error::InvalidRecord { reason, .. }) => assert!(reason.contains("'B1'")),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_text_exports_reject_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![
            Document::from_text("B1", "Paris"),
            Document::from_text("B1", "Bergen"),
        ];

        let result = write_text_exports(&docs, dir.path().join("txt"));
        assert!(matches!(result, Err(Error::InvalidRecord { .. })));
        assert!(!dir.path().join("txt").exists());
    }

    #[test]
    fn test_text_exports_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let docs = vec![
            Document::from_text("B1", "Jeg er i Rom."),
            Document::from_text("B2", "Hilsen fra Dresden."),
        ];

        let written = write_text_exports(&docs, dir.path().join("txt")).unwrap();
        assert_eq!(written.len(), 2);

        let read = read_text_exports(dir.path().join("txt")).unwrap();
        assert_eq!(read, docs);
    }
}
