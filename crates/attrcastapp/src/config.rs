//! # Configuration
//!
//! Attrcast configuration is loaded with [`confique`] from a TOML file and
//! the environment.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Command-line flags**: `--fail-fast`, `--output` (applied by the CLI).
//! 2. **Environment variables**: `ATTRCAST_FAIL_FAST`, `ATTRCAST_OUTPUT`.
//! 3. **Config file**: `--config <path>`, or `attrcast.toml` in the working directory.
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `fail_fast` | `false` | Stop validating at the first failing attribute |
//! | `output` | `"text"` | Report format, `text` or `json` |

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "attrcast.toml";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Configuration for attrcast, stored in `attrcast.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AttrcastConfig {
    /// Stop validating at the first attribute that fails.
    #[config(default = false, env = "ATTRCAST_FAIL_FAST")]
    pub fail_fast: bool,

    /// Report format: "text" or "json".
    #[config(default = "text", env = "ATTRCAST_OUTPUT")]
    pub output: OutputFormat,
}

impl Default for AttrcastConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            output: OutputFormat::Text,
        }
    }
}

impl AttrcastConfig {
    /// Load from `path` (a missing file is skipped), with the environment
    /// taking precedence.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::builder().env().file(path).load()?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// `key = value` pairs of the effective settings.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fail_fast", self.fail_fast.to_string()),
            ("output", format!("{:?}", self.output.to_string())),
        ]
    }

    /// A commented sample `attrcast.toml`.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AttrcastConfig::default();
        assert!(!config.fail_fast);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AttrcastConfig::builder()
            .file(dir.path().join(CONFIG_FILE_NAME))
            .load()
            .unwrap();
        assert_eq!(config, AttrcastConfig::default());
    }

    #[test]
    fn test_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "fail_fast = true\noutput = \"json\"\n").unwrap();

        let config = AttrcastConfig::builder().file(&path).load().unwrap();
        assert!(config.fail_fast);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_bad_output_value_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "output = \"yaml\"\n").unwrap();

        assert!(AttrcastConfig::builder().file(&path).load().is_err());
    }

    #[test]
    fn test_entries() {
        let config = AttrcastConfig {
            output: OutputFormat::Json,
            ..Default::default()
        };
        assert_eq!(
            config.entries(),
            vec![
                ("fail_fast", "false".to_string()),
                ("output", "\"json\"".to_string())
            ]
        );
    }

    #[test]
    fn test_template_lists_settings() {
        let template = AttrcastConfig::template();
        assert!(template.contains("fail_fast"));
        assert!(template.contains("ATTRCAST_OUTPUT"));
    }
}
