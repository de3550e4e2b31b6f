//! File locations
//!
//! Client files live in a data directory (the working directory by
//! default): `<client>.json` holds the scenario and `<base>_config.json`
//! the client configuration, where `<base>` is the client name up to its
//! first underscore. Tool settings live in the platform config directory.

use std::path::{Path, PathBuf};

/// Name used for the settings directory
const APP_NAME: &str = "sms-replay";

/// Path to the scenario file for a client
pub fn scenario_path(dir: &Path, client: &str) -> PathBuf {
    dir.join(format!("{}.json", client))
}

/// Base client identifier used to name the config file
///
/// `acme_staging` shares `acme_config.json` with `acme`.
pub fn base_client(client: &str) -> &str {
    client.split('_').next().unwrap_or(client)
}

/// Path to the config file for a client
pub fn client_config_path(dir: &Path, client: &str) -> PathBuf {
    dir.join(format!("{}_config.json", base_client(client)))
}

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/sms-replay/`
/// - macOS: `~/Library/Application Support/sms-replay/`
/// - Windows: `%APPDATA%\sms-replay\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the settings file
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
