//! Structured export of metadata records.
//!
//! JSON and YAML wrap the records in a `Data` list, the shape stores and
//! [`load_records`](crate::load_records) use. CSV gets one column per key.

use std::io;
use std::path::Path;

use pathmeta_seeker::MetadataRecord;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Serialize)]
struct DataDocument<'a> {
    #[serde(rename = "Data")]
    data: &'a [MetadataRecord],
}

/// Serializes records as pretty-printed `{"Data": [...]}` JSON.
pub fn to_json(records: &[MetadataRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&DataDocument { data: records })?)
}

/// Serializes records as a YAML document with a `Data` list.
pub fn to_yaml(records: &[MetadataRecord]) -> Result<String> {
    Ok(serde_yaml::to_string(&DataDocument { data: records })?)
}

/// Serializes records to CSV.
///
/// The header is the union of all keys in first-seen order; a record lacking
/// a key gets an empty cell.
pub fn to_csv(records: &[MetadataRecord]) -> Result<String> {
    let mut headers: Vec<&str> = Vec::new();
    for key in records.iter().flat_map(MetadataRecord::keys) {
        if !headers.contains(&key) {
            headers.push(key);
        }
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    if !headers.is_empty() {
        wtr.write_record(&headers)?;
    }
    for record in records {
        let row: Vec<&str> = headers
            .iter()
            .map(|h| record.get(h).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }

    let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Writes records to `path`, picking the format from its extension
/// (`json`, `yaml`/`yml` or `csv`).
pub fn export_file<P: AsRef<Path>>(records: &[MetadataRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let content = match format.as_str() {
        "json" => to_json(records)?,
        "yaml" | "yml" => to_yaml(records)?,
        "csv" => to_csv(records)?,
        _ => return Err(Error::UnsupportedFormat(format)),
    };
    std::fs::write(path, content)?;
    Ok(())
}
