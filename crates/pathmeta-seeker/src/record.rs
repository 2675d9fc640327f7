//! Metadata records and file entries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key carrying the path a record was built from.
pub const FILE_PATH_KEY: &str = "FilePath";

/// A flat set of string attributes.
///
/// Equality and hashing ignore insertion order, so two records with the same
/// key/value pairs are the same record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord(BTreeMap<String, String>);

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// The originating path, if the record has one.
    pub fn path(&self) -> Option<&str> {
        self.get(FILE_PATH_KEY)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All attributes except [`FILE_PATH_KEY`].
    pub fn attributes(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .filter(|(k, _)| k.as_str() != FILE_PATH_KEY)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for MetadataRecord {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for MetadataRecord {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl fmt::Display for MetadataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str("}")
    }
}

/// A file and the metadata attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub metadata: BTreeMap<String, String>,
}

impl FileEntry {
    /// Builds an entry from a record, or `None` when the record has no path.
    pub fn from_record(record: &MetadataRecord) -> Option<Self> {
        record.path().map(|path| FileEntry {
            path: path.to_string(),
            metadata: record.attributes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_insertion_order() {
        let a = MetadataRecord::new().with("x", "1").with("y", "2");
        let b = MetadataRecord::new().with("y", "2").with("x", "1");
        assert_eq!(a, b);
    }

    #[test]
    fn attributes_drop_file_path() {
        let record = MetadataRecord::new()
            .with(FILE_PATH_KEY, "a/b.csv")
            .with("name", "b");
        assert_eq!(record.path(), Some("a/b.csv"));
        assert_eq!(record.attributes().len(), 1);
        assert!(record.contains_key(FILE_PATH_KEY));
    }

    #[test]
    fn file_entry_requires_a_path() {
        let with_path = MetadataRecord::new()
            .with(FILE_PATH_KEY, "a/b.csv")
            .with("name", "b");
        let entry = FileEntry::from_record(&with_path).unwrap();
        assert_eq!(entry.path, "a/b.csv");
        assert_eq!(entry.metadata.get("name").map(String::as_str), Some("b"));

        assert!(FileEntry::from_record(&MetadataRecord::new().with("name", "b")).is_none());
    }

    #[test]
    fn display_lists_pairs_in_key_order() {
        let record: MetadataRecord = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(record.to_string(), "{a: 1, b: 2}");
    }
}
