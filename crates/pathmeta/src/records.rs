//! Loading records returned by a metadata store.
//!
//! Stores answer with JSON; three shapes are accepted:
//!
//! ```text
//! [ {"FilePath": "a.wav", "part": "E"}, ... ]
//! {"Items": [ ... ]}
//! {"Data": [ ... ]}
//! ```
//!
//! Numbers and booleans are converted to strings, `null` values are dropped.

use std::path::Path;

use pathmeta_seeker::MetadataRecord;
use serde_json::Value;

use crate::error::{Error, Result};

/// Parses records from a JSON document.
pub fn load_records(json: &str) -> Result<Vec<MetadataRecord>> {
    let document: Value = serde_json::from_str(json)?;

    let items = match &document {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("Items").or_else(|| obj.get("Data")) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(Error::InvalidRecords(
                    "'Items'/'Data' must be an array".to_string(),
                ))
            }
            None => {
                return Err(Error::InvalidRecords(
                    "expected an array or an object with 'Items' or 'Data'".to_string(),
                ))
            }
        },
        _ => {
            return Err(Error::InvalidRecords(
                "expected an array or an object with 'Items' or 'Data'".to_string(),
            ))
        }
    };

    items.iter().enumerate().map(|(i, item)| to_record(i, item)).collect()
}

/// Reads and parses a JSON records file.
pub fn load_records_file<P: AsRef<Path>>(path: P) -> Result<Vec<MetadataRecord>> {
    let content = std::fs::read_to_string(path)?;
    load_records(&content)
}

fn to_record(index: usize, item: &Value) -> Result<MetadataRecord> {
    let Value::Object(obj) = item else {
        return Err(Error::InvalidRecords(format!("record {index} is not an object")));
    };

    let mut record = MetadataRecord::new();
    for (key, value) in obj {
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                return Err(Error::InvalidRecords(format!(
                    "record {index}: value of '{key}' is not a scalar"
                )))
            }
        };
        record.insert(key.as_str(), value);
    }
    Ok(record)
}
