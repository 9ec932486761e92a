//! Converter configuration.
//!
//! Loaded from a JSON file; every field is optional. Command-line flags
//! override whatever the file sets.
//!
//! ```json
//! { "layout": {"indented": 2}, "variables": "initial",
//!   "keep_empty": false, "annotator": "jdchoi", "jobs": 4 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::penman::{Layout, SerializeOptions, VariablePolicy};
use crate::{Error, Result};

pub const DEFAULT_ANNOTATOR: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub layout: Layout,
    pub variables: VariablePolicy,
    /// Print records that carry no graph (metadata and sentence only).
    pub keep_empty: bool,
    /// Annotator stamped on records imported from plain text.
    pub annotator: String,
    /// Worker threads for directory conversion; `None` uses every core.
    pub jobs: Option<usize>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            variables: VariablePolicy::default(),
            keep_empty: false,
            annotator: DEFAULT_ANNOTATOR.to_string(),
            jobs: None,
        }
    }
}

impl ConvertConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(Error::Config("jobs must be at least 1".into()));
        }
        if self.annotator.is_empty() || self.annotator.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(Error::Config(format!("invalid annotator name '{}'", self.annotator)));
        }
        if let VariablePolicy::Sequential { prefix } = &self.variables {
            if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(Error::Config(format!("variable prefix '{prefix}' must be letters")));
            }
        }
        Ok(())
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            layout: self.layout,
            variables: self.variables.clone(),
        }
    }

    pub fn with_annotator(mut self, annotator: impl Into<String>) -> Self {
        self.annotator = annotator.into();
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }
}
