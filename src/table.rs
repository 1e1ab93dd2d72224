//! CSV tables exchanged between pipeline stages.
//!
//! | File                  | Columns                          |
//! |-----------------------|----------------------------------|
//! | exploded entity table | `files,location`                 |
//! | frequency table       | `loc,count`                      |
//! | coordinate table      | `loc,lat,lon,count,address`      |

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Document, FrequencyRecord, MapPoint, Mention};

#[derive(Debug, Serialize, Deserialize)]
struct ExplodedRow {
    files: String,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoordinateRow {
    loc: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default, alias = "long")]
    lon: Option<f64>,
    count: u64,
    #[serde(default)]
    address: Option<String>,
}

fn writer_for(path: &Path) -> Result<csv::Writer<fs::File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(csv::Writer::from_path(path)?)
}

fn reader_for(path: &Path) -> Result<csv::Reader<fs::File>> {
    if !path.is_file() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    Ok(csv::Reader::from_path(path)?)
}

fn row_location(path: &Path, index: usize) -> String {
    // header is line 1
    format!("{}:{}", path.display(), index + 2)
}

/// Write the exploded entity table.
///
/// Every document gets one row per mention, in mention order. A document
/// without mentions still gets a single row with an empty location. A
/// repeated document id is written once.
pub fn write_mentions<P: AsRef<Path>>(
    path: P,
    documents: &[Document],
    mentions: &[Mention],
) -> Result<()> {
    let mut by_document: HashMap<&str, Vec<&str>> = HashMap::new();
    for mention in mentions {
        by_document
            .entry(mention.document_id.as_str())
            .or_default()
            .push(mention.raw.as_str());
    }

    let mut writer = writer_for(path.as_ref())?;
    let mut written: HashSet<&str> = HashSet::with_capacity(documents.len());
    for doc in documents {
        if !written.insert(doc.id.as_str()) {
            continue;
        }
        match by_document.get(doc.id.as_str()) {
            Some(raws) => {
                for raw in raws {
                    writer.serialize(ExplodedRow {
                        files: doc.id.clone(),
                        location: Some(raw.to_string()),
                    })?;
                }
            }
            None => writer.serialize(ExplodedRow {
                files: doc.id.clone(),
                location: None,
            })?,
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read the exploded entity table, skipping rows without a location.
pub fn read_mentions<P: AsRef<Path>>(path: P) -> Result<Vec<Mention>> {
    let path = path.as_ref();
    let mut reader = reader_for(path)?;
    let mut mentions = Vec::new();

    for (index, row) in reader.deserialize::<ExplodedRow>().enumerate() {
        let row = row.map_err(|e| Error::invalid_record(row_location(path, index), e.to_string()))?;
        if let Some(location) = row.location.filter(|l| !l.is_empty()) {
            mentions.push(Mention::new(row.files, location));
        }
    }
    Ok(mentions)
}

/// Write the frequency table.
pub fn write_frequencies<P: AsRef<Path>>(path: P, records: &[FrequencyRecord]) -> Result<()> {
    let mut writer = writer_for(path.as_ref())?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the frequency table.
pub fn read_frequencies<P: AsRef<Path>>(path: P) -> Result<Vec<FrequencyRecord>> {
    let path = path.as_ref();
    let mut reader = reader_for(path)?;
    let mut records = Vec::new();

    for (index, row) in reader.deserialize::<FrequencyRecord>().enumerate() {
        let record =
            row.map_err(|e| Error::invalid_record(row_location(path, index), e.to_string()))?;
        if record.count == 0 {
            return Err(Error::invalid_record(
                row_location(path, index),
                format!("count for '{}' must be at least 1", record.name),
            ));
        }
        records.push(record);
    }
    Ok(records)
}

/// Write the coordinate table.
pub fn write_coordinates<P: AsRef<Path>>(path: P, points: &[MapPoint]) -> Result<()> {
    let mut writer = writer_for(path.as_ref())?;
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the coordinate table.
///
/// Rows without both coordinates are dropped, so tables that still list
/// unresolved names can be read as well. Coordinates that are not finite or
/// fall outside WGS84 bounds are an error.
pub fn read_coordinates<P: AsRef<Path>>(path: P) -> Result<Vec<MapPoint>> {
    let path = path.as_ref();
    let mut reader = reader_for(path)?;
    let mut points = Vec::new();

    for (index, row) in reader.deserialize::<CoordinateRow>().enumerate() {
        let row = row.map_err(|e| Error::invalid_record(row_location(path, index), e.to_string()))?;
        if let (Some(lat), Some(lon)) = (row.lat, row.lon) {
            let point = MapPoint {
                name: row.loc,
                lat,
                lon,
                count: row.count,
                address: row.address.filter(|a| !a.is_empty()),
            };
            if !point.is_valid() {
                return Err(Error::invalid_record(
                    row_location(path, index),
                    format!("invalid coordinates for '{}': {}, {}", point.name, lat, lon),
                ));
            }
            points.push(point);
        }
    }
    Ok(points)
}
