//! Settings file handling
//!
//! Tool-wide settings read from `config.toml` in the platform config
//! directory. Every field has a default, so a missing file is fine.

use serde::Deserialize;
use std::path::Path;

use super::paths::settings_path;
use super::Result;

/// Main settings structure
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Playback policies
    #[serde(default)]
    pub playback: PlaybackSettings,

    /// Conversational agent API settings
    #[serde(default)]
    pub agent: AgentSettings,
}

/// What to do with the session reset request before playback
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Do not send the reset request
    Skip,
    /// Send it, log a failure and keep going
    #[default]
    Lenient,
    /// Send it and abort the run on failure
    Strict,
}

/// HTTP client settings
#[derive(Debug, Deserialize)]
pub struct HttpSettings {
    /// Timeout for every request, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Playback policies
#[derive(Debug, Deserialize, Default)]
pub struct PlaybackSettings {
    /// Session reset policy
    #[serde(default)]
    pub reset: ResetPolicy,

    /// Abort the run when a reply carries an empty message
    #[serde(default)]
    pub strict: bool,
}

/// Conversational agent API settings
#[derive(Debug, Deserialize)]
pub struct AgentSettings {
    /// Base URL of the agent REST API
    #[serde(default = "default_agent_endpoint")]
    pub endpoint: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            endpoint: default_agent_endpoint(),
        }
    }
}

fn default_agent_endpoint() -> String {
    "https://dialogflow.googleapis.com/v2".to_string()
}

impl Settings {
    /// Load settings from the default settings file
    ///
    /// Returns default settings if the file doesn't exist
    pub fn load() -> Result<Self> {
        match settings_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, e))?;
        toml::from_str(&content).map_err(|e| super::Error::SettingsParse(e.to_string()))
    }
}
