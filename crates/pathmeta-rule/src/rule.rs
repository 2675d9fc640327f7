//! Compiled path rules.
//!
//! A [`PathRule`] is built once from a template and then reused to match any
//! number of paths. The only mutation after compilation is
//! [`PathRule::refine`], which recomputes how many splitter characters each
//! value may contain.

use std::fmt;

use crate::error::{CompileError, Result};
use crate::template::{scan, Slot, IGNORE_MARKER, UNUSED_MARKER};

/// Default path separator.
pub const DEFAULT_SEPARATOR: char = '/';

/// One parsing key of a compiled rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParsingKey {
    /// A placeholder whose captured value is kept under this name.
    Named(String),
    /// The `{_}` marker: the span is matched but discarded.
    Ignored,
    /// Literal text that was not bracketed in the template.
    Unused,
}

impl ParsingKey {
    fn from_placeholder(name: &str) -> Self {
        match name {
            IGNORE_MARKER => ParsingKey::Ignored,
            UNUSED_MARKER => ParsingKey::Unused,
            other => ParsingKey::Named(other.to_string()),
        }
    }

    fn from_slot(slot: &Slot) -> Self {
        match slot {
            Slot::Bracketed(name) => Self::from_placeholder(name),
            Slot::Unused(_) => ParsingKey::Unused,
        }
    }

    /// Returns the key name if this key produces a value.
    pub fn name(&self) -> Option<&str> {
        match self {
            ParsingKey::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if the captured span is kept in the match result.
    pub fn is_named(&self) -> bool {
        matches!(self, ParsingKey::Named(_))
    }

    /// Returns the key as it appears in a rewritten template.
    pub fn as_str(&self) -> &str {
        match self {
            ParsingKey::Named(name) => name,
            ParsingKey::Ignored => IGNORE_MARKER,
            ParsingKey::Unused => UNUSED_MARKER,
        }
    }
}

impl fmt::Display for ParsingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A template compiled into a reusable path matcher.
///
/// # Example
///
/// ```
/// use pathmeta_rule::PathRule;
///
/// let rule = PathRule::compile("{_}/{animal}/{date}-{index}.png", "png").unwrap();
/// let meta = rule.match_path("dataset/dog/0405-3.png").unwrap();
/// assert_eq!(meta["animal"], "dog");
/// assert_eq!(meta["date"], "0405");
/// assert_eq!(meta["index"], "3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pub(crate) source: String,
    pub(crate) template: String,
    pub(crate) extension: String,
    pub(crate) separator: char,
    pub(crate) keys: Vec<ParsingKey>,
    pub(crate) splitters: Vec<char>,
    pub(crate) embedded: Vec<usize>,
    pub(crate) unused: Vec<String>,
    pub(crate) example: Option<String>,
}

impl PathRule {
    /// Compiles a template with the default `/` separator.
    ///
    /// `.{extension}` is appended to the template when missing. A leading dot
    /// on `extension` is ignored.
    pub fn compile(template: &str, extension: &str) -> Result<Self> {
        Self::compile_with_separator(template, extension, DEFAULT_SEPARATOR)
    }

    /// Compiles a template using a custom path separator.
    pub fn compile_with_separator(template: &str, extension: &str, separator: char) -> Result<Self> {
        if template.trim().is_empty() {
            return Err(CompileError::EmptyTemplate);
        }

        let extension = extension.trim().trim_start_matches('.');
        let source = with_extension(template, extension);

        let scanned = scan(&source, separator)?;
        let keys: Vec<ParsingKey> = scanned.slots.iter().map(ParsingKey::from_slot).collect();

        let mut splitters = scanned.splitters;
        if !splitters.contains(&separator) {
            splitters.push(separator);
        }

        Ok(Self {
            embedded: vec![0; keys.len()],
            template: scanned.rewritten,
            extension: extension.to_string(),
            source,
            separator,
            keys,
            splitters,
            unused: scanned.unused,
            example: None,
        })
    }

    /// Recomputes per-key embedded-splitter counts from a fully bracketed
    /// example such as `{Origin}/hoge{1}/fuga{suzuki}piyo_{2022_03_02}.csv`.
    ///
    /// The rule's extension is appended to the example when missing, as for
    /// the template itself. The example must then yield as many segments as
    /// the rule has keys; on error the rule is left unchanged.
    pub fn refine(&mut self, example: &str) -> Result<()> {
        if example.trim().is_empty() {
            return Err(CompileError::EmptyTemplate);
        }

        let example = with_extension(example, &self.extension);
        let scanned = scan(&example, self.separator)?;
        if scanned.slots.len() != self.keys.len() {
            return Err(CompileError::ExampleMismatch {
                example,
                expected: self.keys.len(),
                found: scanned.slots.len(),
            });
        }

        self.embedded = scanned
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Bracketed(value) if value != IGNORE_MARKER => value
                    .chars()
                    .filter(|c| self.splitters.contains(c))
                    .count(),
                _ => 0,
            })
            .collect();
        self.example = Some(example);
        Ok(())
    }

    /// Consuming form of [`refine`](Self::refine).
    pub fn refined(mut self, example: &str) -> Result<Self> {
        self.refine(example)?;
        Ok(self)
    }

    /// Returns `true` if the rule extracts at least one named value.
    pub fn validate(&self) -> bool {
        self.keys.iter().any(ParsingKey::is_named)
    }

    /// The template as given, with the extension appended.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The rewritten template: unused literals wrapped, adjacent
    /// placeholders separated.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The file extension (without the leading dot).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The path separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Parsing keys in template order.
    pub fn keys(&self) -> &[ParsingKey] {
        &self.keys
    }

    /// Names of the keys that produce values, in template order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().filter_map(ParsingKey::name)
    }

    /// Splitter characters; always includes the separator.
    pub fn splitters(&self) -> &[char] {
        &self.splitters
    }

    /// Embedded-splitter count per key, aligned with [`keys`](Self::keys).
    pub fn embedded_counts(&self) -> &[usize] {
        &self.embedded
    }

    /// Distinct literal runs that were not bracketed.
    pub fn unused(&self) -> &[String] {
        &self.unused
    }

    /// The example last used to refine this rule.
    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }
}

/// Appends `.{extension}` to `text` unless it already ends with it.
fn with_extension(text: &str, extension: &str) -> String {
    let mut out = text.to_string();
    if !extension.is_empty() && !out.ends_with(&format!(".{extension}")) {
        out.push('.');
        out.push_str(extension);
    }
    out
}

impl fmt::Display for PathRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
