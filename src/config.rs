use crate::error::EngineError;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "REWRAPPED_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_filter_year")]
    pub filter_year: i32,
    /// Plays at or under this many milliseconds are skipped.
    #[serde(default = "default_min_ms_played")]
    pub min_ms_played: u64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_filter_year() -> i32 {
    2021
}

fn default_min_ms_played() -> u64 {
    10_000
}

fn default_timezone() -> String {
    String::from("UTC")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            filter_year: default_filter_year(),
            min_ms_played: default_min_ms_played(),
            timezone: default_timezone(),
        }
    }
}

impl EngineConfig {
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn tz(&self) -> Result<Tz, EngineError> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| EngineError::invalid("timezone", format!("unknown timezone {:?}", self.timezone)))
    }
}

pub fn config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path.map(Path::to_path_buf).or_else(config_path) {
        Some(path) => load_config_from_path(&path),
        None => Ok(EngineConfig::default()),
    }
}

pub fn load_config_from_path(path: &Path) -> Result<EngineConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    config
        .tz()
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(config)
}
