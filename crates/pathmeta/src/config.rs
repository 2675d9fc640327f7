//! Rule configuration files.
//!
//! ```yaml
//! template: "{_}/{disease}/{_}-{patient-id}-{part}-{iteration}"
//! extension: wav
//! example: "{Origin}/{cyst}/{1}-{055}-{E}-{a01}.wav"
//! attributes:
//!   dataset: voice
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use pathmeta_rule::{PathRule, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Everything needed to tag a batch of files: the path rule and the static
/// attributes added to every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub template: String,
    pub extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<char>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl RuleConfig {
    pub fn new(template: impl Into<String>, extension: impl Into<String>) -> Self {
        RuleConfig {
            template: template.into(),
            extension: extension.into(),
            example: None,
            separator: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the fully bracketed example used to refine the rule.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Adds a static attribute merged into every tagged record.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config file, picking the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let content = std::fs::read_to_string(path)?;

        match format.as_str() {
            "yaml" | "yml" => Self::from_yaml(&content),
            "json" => Self::from_json(&content),
            _ => Err(Error::UnsupportedFormat(format)),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Compiles the template, refined by the example when one is set.
    ///
    /// Fails when the rule captures no named value.
    pub fn compile(&self) -> Result<PathRule> {
        let separator = self.separator.unwrap_or(DEFAULT_SEPARATOR);
        let mut rule = PathRule::compile_with_separator(&self.template, &self.extension, separator)?;
        if let Some(example) = &self.example {
            rule.refine(example)?;
        }
        if !rule.validate() {
            return Err(Error::InvalidRule {
                template: rule.source().to_string(),
            });
        }

        debug!(
            template = %rule.source(),
            rewritten = %rule.template(),
            keys = rule.keys().len(),
            refined = rule.example().is_some(),
            "Compiled path rule"
        );
        Ok(rule)
    }
}
