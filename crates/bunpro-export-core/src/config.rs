//! Export configuration.
//!
//! Loaded from a TOML file; every field has a default so a missing or
//! partial file is fine.
//!
//! # Resolution
//!
//! 1. An explicit path (`--config`); it must exist.
//! 2. `$BUNPRO_EXPORT_CONFIG`; it must exist.
//! 3. `<config dir>/bunpro-export/config.toml`; defaults if absent.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{DEFAULT_BASE_URL, DEFAULT_REVIEWABLE_TYPE};
use crate::error::{Error, Result};
use crate::level::ProficiencyLevel;

/// Directory name under the platform config dir.
pub const PROJECT_NAME: &str = "bunpro-export";

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "BUNPRO_EXPORT_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";
const TOKEN_FILE_NAME: &str = "token";

/// Settings for one export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// API host, without path
    pub api_base_url: String,
    /// `reviewable_type` query parameter
    pub reviewable_type: String,
    /// Pause between page requests, in milliseconds
    pub page_delay_ms: u64,
    /// How long to wait for a token to appear, in seconds
    pub token_wait_secs: u64,
    /// How often to re-check for a token while waiting, in milliseconds
    pub token_poll_ms: u64,
    /// Directory the CSV lands in when no explicit output path is given
    pub output_dir: PathBuf,
    /// Where the captured token is cached
    pub token_file: PathBuf,
    /// Levels to export, in order
    pub levels: Vec<ProficiencyLevel>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            reviewable_type: DEFAULT_REVIEWABLE_TYPE.to_string(),
            page_delay_ms: 150,
            token_wait_secs: 30,
            token_poll_ms: 300,
            output_dir: PathBuf::from("."),
            token_file: default_token_path().unwrap_or_else(|| PathBuf::from(".bunpro-token")),
            levels: ProficiencyLevel::ALL.to_vec(),
        }
    }
}

impl ExportConfig {
    /// Default config file location for this platform.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(PROJECT_NAME).join(CONFIG_FILE_NAME))
    }

    /// Resolves which config file to use, without reading it.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Loads and validates the configuration.
    ///
    /// Explicit or environment-provided paths must exist; the default path
    /// falls back to defaults when absent.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_ENV_VAR).is_ok_and(|p| !p.is_empty());
        let must_exist = explicit.is_some() || from_env;

        let config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if must_exist => {
                let message = format!("Config file not found: {}", path.display());
                return Err(Error::config(message));
            }
            _ => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reads a config file without validating it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Checks the settings are usable.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(Error::config(format!(
                "api_base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.reviewable_type.trim().is_empty() {
            return Err(Error::config("reviewable_type must not be empty"));
        }
        if self.token_poll_ms == 0 {
            return Err(Error::config("token_poll_ms must be greater than 0"));
        }
        if self.levels.is_empty() {
            return Err(Error::config("levels must not be empty"));
        }
        for (i, level) in self.levels.iter().enumerate() {
            if self.levels[..i].contains(level) {
                return Err(Error::config(format!("level '{}' listed twice", level.api_name())));
            }
        }
        Ok(())
    }

    /// Serializes to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Pause between page requests.
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Bounded wait for a token.
    pub fn token_wait(&self) -> Duration {
        Duration::from_secs(self.token_wait_secs)
    }

    /// Poll interval while waiting for a token.
    pub fn token_poll(&self) -> Duration {
        Duration::from_millis(self.token_poll_ms)
    }
}

/// Default token cache location for this platform.
pub fn default_token_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(PROJECT_NAME).join(TOKEN_FILE_NAME))
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Looks up a dotted key (`a.b.c`) in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Formats a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(items) => items
            .iter()
            .map(format_toml_value)
            .collect::<Vec<_>>()
            .join(","),
        toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

impl ExportConfig {
    /// Returns the value at a dotted key, formatted for display.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        get_nested_value(&value, key)
            .map(format_toml_value)
            .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
    }
}
