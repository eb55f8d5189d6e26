//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/deadlinesync/config.toml` by default.
//!
//! The Canvas `token` supports secret references:
//! - `pass::path/in/store` resolved via `pass show`
//! - `env::VAR_NAME` resolved from the environment
//! - `file::/path` read from a file
//! - plain text used as-is

use std::path::{Path, PathBuf};
use std::time::Duration;

use deadlinesync_providers::UpsertOptions;
use deadlinesync_providers::canvas::CanvasConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Configuration for the deadlinesync client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Canvas connection settings.
    pub canvas: Option<CanvasSettings>,

    /// Debug mode.
    pub debug: bool,

    /// What to collect.
    pub scan: ScanSettings,

    /// Where and how to write events.
    pub calendar: CalendarSettings,
}

/// Canvas connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Base URL of the Canvas instance.
    pub base_url: Option<String>,

    /// API token (supports `pass::`, `env::` and `file::` prefixes).
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: CanvasConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Collection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Mine syllabus documents for exam dates.
    pub include_syllabus: bool,

    /// Only these course ids; empty means all active courses.
    pub course_ids: Vec<u64>,
}

/// Calendar output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Path of the `.ics` file written by `sync`.
    pub ics_path: Option<PathBuf>,

    /// IANA timezone attached to written events.
    pub timezone: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            ics_path: None,
            timezone: UpsertOptions::default().timezone,
        }
    }
}

impl CalendarSettings {
    /// Returns the configured `.ics` path, or the default one in the data dir.
    pub fn ics_path_or_default(&self) -> PathBuf {
        self.ics_path
            .clone()
            .unwrap_or_else(|| ClientConfig::default_data_dir().join("deadlines.ics"))
    }

    pub fn upsert_options(&self) -> UpsertOptions {
        UpsertOptions::default().with_timezone(self.timezone.clone())
    }
}

impl ClientConfig {
    /// Loads configuration from the default path; a missing file gives defaults.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> ClientResult<Self> {
        toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deadlinesync")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deadlinesync")
    }

    /// Returns the Canvas settings, or an error explaining how to add them.
    pub fn canvas(&self) -> ClientResult<&CanvasSettings> {
        self.canvas.as_ref().ok_or_else(|| {
            ClientError::Config(format!(
                "Canvas is not configured. Add to {}:\n  \
                 [canvas]\n  \
                 base_url = \"https://school.instructure.com\"\n  \
                 token = \"env::CANVAS_API_TOKEN\"",
                Self::default_path().display()
            ))
        })
    }
}

impl CanvasSettings {
    /// Resolves the token and builds the Canvas source configuration.
    pub fn to_source_config(&self) -> ClientResult<CanvasConfig> {
        let base_url = self
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ClientError::Config("base_url is missing from [canvas]".to_string()))?;
        let raw_token = self
            .token
            .as_deref()
            .ok_or_else(|| ClientError::Config("token is missing from [canvas]".to_string()))?;
        let token = crate::secret::resolve(raw_token)?;

        let config = CanvasConfig::new(base_url, token)
            .map_err(|e| ClientError::Config(format!("invalid base_url {:?}: {}", base_url, e)))?
            .with_timeout(Duration::from_secs(self.timeout_secs));
        config.validate().map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(config)
    }
}
