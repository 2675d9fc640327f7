//! Batch tagging: turn file paths into metadata records.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use pathmeta_rule::{PathNotParsableError, PathRule};
use pathmeta_seeker::{MetadataRecord, ResultSet, FILE_PATH_KEY};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::RuleConfig;
use crate::error::{Error, Result};

/// Outcome of tagging a batch of paths.
#[derive(Debug, Clone, Default)]
pub struct TaggingReport {
    /// One record per parsed path, in input order.
    pub records: Vec<MetadataRecord>,
    /// Paths the rule could not parse.
    pub unparsable: Vec<PathNotParsableError>,
}

impl TaggingReport {
    /// Returns `true` if every path was parsed.
    pub fn is_complete(&self) -> bool {
        self.unparsable.is_empty()
    }

    /// Number of paths looked at.
    pub fn total(&self) -> usize {
        self.records.len() + self.unparsable.len()
    }

    /// Wraps the tagged records in a result set for querying.
    pub fn into_result_set(self, source: impl Into<String>) -> ResultSet {
        ResultSet::fetched(source, self.records, "")
    }
}

/// Builds the record for one path: static attributes, then the values the
/// rule extracts, then the path itself under `FilePath`.
pub fn tag_path(
    rule: &PathRule,
    path: &str,
    attributes: &BTreeMap<String, String>,
) -> std::result::Result<MetadataRecord, PathNotParsableError> {
    let metadata = rule.match_path(path)?;

    let mut record = MetadataRecord::from(attributes.clone());
    record.extend(metadata);
    record.insert(FILE_PATH_KEY, path);
    Ok(record)
}

/// Tags every path, collecting the ones the rule cannot parse.
pub fn tag_paths<I, S>(rule: &PathRule, paths: I, attributes: &BTreeMap<String, String>) -> TaggingReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = TaggingReport::default();

    for path in paths {
        let path = path.as_ref();
        match tag_path(rule, path, attributes) {
            Ok(record) => {
                debug!(path, fields = record.len(), "Tagged path");
                report.records.push(record);
            }
            Err(e) => {
                warn!(path, expected = e.expected, found = e.found, "Path does not match rule");
                report.unparsable.push(e);
            }
        }
    }

    info!(
        template = %rule.source(),
        tagged = report.records.len(),
        unparsable = report.unparsable.len(),
        "Tagging complete"
    );
    report
}

/// Tags every file under `root` with the configured extension.
///
/// Paths are matched relative to `root`, joined with `/`. The first file is
/// checked before anything else: when it does not fit the rule the scan stops
/// with [`Error::RuleMismatch`], since the rule most likely needs an example.
pub fn scan_dir<P: AsRef<Path>>(root: P, config: &RuleConfig) -> Result<TaggingReport> {
    let root = root.as_ref();
    let rule = config.compile()?;
    let extension = rule.extension().to_string();

    info!(root = %root.display(), template = %rule.source(), "Starting directory scan");

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let has_extension = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension);
        if !has_extension {
            continue;
        }

        match relative_path(root, entry.path()) {
            Some(rel) => paths.push(rel),
            None => warn!(path = %entry.path().display(), "Skipping path that is not valid UTF-8"),
        }
    }

    if let Some(first) = paths.first() {
        if !rule.is_matchable(first) {
            return Err(Error::RuleMismatch {
                template: rule.source().to_string(),
                path: first.clone(),
            });
        }
    }

    Ok(tag_paths(&rule, &paths, &config.attributes))
}

/// `path` relative to `root`, components joined with `/`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
