//! Matching concrete paths against a compiled rule.
//!
//! Matching runs in two passes. The path is first normalized so that every
//! unused literal sits in its own separator-delimited segment. The normalized
//! path is then split into values: a splitter closes the current value unless
//! the value is still allowed to swallow more splitters (its embedded count).

use std::collections::BTreeMap;

use crate::error::PathNotParsableError;
use crate::rule::PathRule;

/// Metadata extracted from one path: key name to captured value.
pub type PathMetadata = BTreeMap<String, String>;

impl PathRule {
    /// Extracts named values from `path`.
    ///
    /// Fails when the path splits into a different number of segments than
    /// the rule has keys.
    ///
    /// Unused literals are located by plain substring search, so a value that
    /// contains one of the rule's literal runs is split at it. With
    /// `{_}/{name}.csv`, the path `csvdata/bob.csv` yields an extra `csv`
    /// segment and is not parsable. Bracket such text in the template instead
    /// of leaving it literal.
    pub fn match_path(&self, path: &str) -> Result<PathMetadata, PathNotParsableError> {
        let values = self.split_values(path)?;
        Ok(self
            .keys
            .iter()
            .zip(values)
            .filter_map(|(key, value)| key.name().map(|name| (name.to_string(), value)))
            .collect())
    }

    /// Returns `true` if [`match_path`](Self::match_path) would succeed.
    pub fn is_matchable(&self, path: &str) -> bool {
        self.split_values(path).is_ok()
    }

    /// Rewrites `path` so unused literals become their own segments.
    ///
    /// `Origin/hoge1/fugasuzukipiyo_03.csv` becomes
    /// `Origin/hoge/1/fuga/suzuki/piyo/03/csv/` for the rule
    /// `{_}/hoge{num1}/fuga{name}piyo_{month}.csv`.
    pub fn normalize_path(&self, path: &str) -> String {
        let sep = self.separator;
        let sep_str = sep.to_string();
        let mut normalized = path.strip_prefix(sep).unwrap_or(path).to_string();

        for literal in &self.unused {
            normalized = normalized.replace(literal.as_str(), &format!("{sep}{literal}{sep}"));
        }
        normalized = collapse_separator_runs(&normalized, sep);

        // The separator goes last so that "//" left behind by earlier
        // splitters is folded too.
        let mut splitters = self.splitters.clone();
        splitters.sort_unstable();
        splitters.retain(|&c| c != sep);
        splitters.push(sep);

        for splitter in splitters {
            normalized = normalized
                .replace(&format!("{splitter}{sep}"), &sep_str)
                .replace(&format!("{sep}{splitter}"), &sep_str);
        }

        match normalized.strip_prefix(sep) {
            Some(rest) => rest.to_string(),
            None => normalized,
        }
    }

    fn split_values(&self, path: &str) -> Result<Vec<String>, PathNotParsableError> {
        let normalized = self.normalize_path(path);
        let expected = self.keys.len();

        let mut values = Vec::with_capacity(expected);
        let mut current = String::new();
        let mut seen = 0usize;

        for c in normalized.chars() {
            if !self.splitters.contains(&c) {
                current.push(c);
                continue;
            }
            let limit = self.embedded.get(values.len()).copied().unwrap_or(0);
            if seen == limit {
                values.push(std::mem::take(&mut current));
                seen = 0;
            } else {
                seen += 1;
                current.push(c);
            }
        }
        if !current.is_empty() {
            values.push(current);
        }

        if values.len() != expected {
            return Err(PathNotParsableError {
                path: path.to_string(),
                expected,
                found: values.len(),
            });
        }
        Ok(values)
    }
}

/// Collapses every run of three or more separators into one.
fn collapse_separator_runs(path: &str, sep: char) -> String {
    let mut out = String::with_capacity(path.len());
    let mut run = 0usize;

    let flush = |out: &mut String, run: usize| {
        let count = if run >= 3 { 1 } else { run };
        out.extend(std::iter::repeat(sep).take(count));
    };

    for c in path.chars() {
        if c == sep {
            run += 1;
        } else {
            flush(&mut out, run);
            run = 0;
            out.push(c);
        }
    }
    flush(&mut out, run);
    out
}
