//! Runner configuration loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```yaml
//! separator: " "
//! convention: center      # or: corner
//! extension: asc
//! output_file_name: merged_dtm.asc
//! ```

use crate::RunnerError;
use dtmerge_dem::{AscFormat, HeaderConvention, MergeOptions, DEFAULT_EXTENSION, DEFAULT_OUTPUT_FILE_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by every merge in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Separator between header names and values and between samples.
    pub separator: char,
    /// Header field-name convention for input and output.
    pub convention: HeaderConvention,
    /// Extension of tile files to merge.
    pub extension: String,
    /// Name of the merged file written to the output directory.
    pub output_file_name: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            separator: ' ',
            convention: HeaderConvention::Center,
            extension: DEFAULT_EXTENSION.to_string(),
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
        }
    }
}

impl RunnerConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RunnerError> {
        // serde_yaml rejects an empty document for a struct
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: RunnerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RunnerError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Check that the settings can produce readable files.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.separator == '\n' || self.separator == '\r' {
            return Err(RunnerError::ConfigError("separator cannot be a line break".to_string()));
        }
        if self.separator == '.' || self.separator == '-' || self.separator.is_ascii_alphanumeric() {
            return Err(RunnerError::ConfigError(format!(
                "separator '{}' would clash with numeric values",
                self.separator
            )));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(RunnerError::ConfigError("extension cannot be empty".to_string()));
        }
        if self.output_file_name.is_empty() || self.output_file_name.contains(['/', '\\']) {
            return Err(RunnerError::ConfigError(format!(
                "invalid output file name '{}'",
                self.output_file_name
            )));
        }
        Ok(())
    }

    /// Options for the merge library.
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            format: AscFormat {
                convention: self.convention,
                separator: self.separator,
            },
            extension: self.extension.trim_start_matches('.').to_string(),
            output_file_name: self.output_file_name.clone(),
        }
    }
}
