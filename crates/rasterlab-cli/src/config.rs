//! Optional YAML settings for the interpreter.
//!
//! ```yaml
//! log_level: debug
//! histogram:
//!   glyph: "#"
//! save:
//!   default_ascii: true
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub log_level: Option<String>,
    pub histogram: HistogramConfig,
    pub save: SaveConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Character repeated to draw each bar.
    pub glyph: char,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self { glyph: '*' }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Write ASCII netpbm when `SAVE` has no `ascii` keyword.
    pub default_ascii: bool,
}

impl CliConfig {
    /// The configured log level, if it names one.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.log_level.as_deref()?.parse().ok()
    }
}

pub fn parse_config(contents: &str) -> Result<CliConfig> {
    // An empty document is null in YAML
    if contents.trim().is_empty() {
        return Ok(CliConfig::default());
    }
    serde_yaml::from_str(contents).context("Failed to parse config YAML")
}

pub fn load_config(path: &Path) -> Result<CliConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Invalid config file {}", path.display()))
}
