use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::directory::DEFAULT_BASE_PATH;
use crate::errors::{MentionError, Result};
use crate::types::Account;

/// Name of the configuration file.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the directory holding the configuration, below the user's config dir.
pub const CONFIG_DIR: &str = "mentions";

/// Configuration for resolving mentions against a Nextcloud server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentionsConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Server base URL, e.g. `https://cloud.example.com`.
    pub server_url: String,
    /// User id to authenticate as.
    pub user_id: String,
    /// App password or token for `user_id`.
    pub token: String,
    /// OCS API base path, relative to `server_url`.
    pub base_path: String,
    /// Timeout for a single directory request, in seconds.
    pub timeout_secs: u64,
    /// Avatar size in pixels used when building avatar URLs.
    pub avatar_size: u32,
}

impl Default for MentionsConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server_url: String::new(),
            user_id: String::new(),
            token: String::new(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout_secs: 30,
            avatar_size: 64,
        }
    }
}

impl MentionsConfig {
    /// Builds the account described by this configuration.
    ///
    /// Fails if the server URL or user id is missing.
    pub fn account(&self) -> Result<Account> {
        if self.server_url.trim().is_empty() {
            return Err(MentionError::Config {
                message: "server_url is not set".to_string(),
            });
        }
        if self.user_id.trim().is_empty() {
            return Err(MentionError::Config {
                message: "user_id is not set".to_string(),
            });
        }
        Ok(Account::new(&self.user_id, &self.server_url, &self.token))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Returns the default configuration path,
/// `<config dir>/mentions/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILENAME)
}

/// Loads the configuration from `config_path`.
///
/// If the file does not exist, returns the default configuration.
pub fn load_config(config_path: &Path) -> Result<MentionsConfig> {
    if !config_path.exists() {
        return Ok(MentionsConfig::default());
    }

    let contents = fs::read_to_string(config_path).map_err(|e| MentionError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: MentionsConfig =
        serde_json::from_str(&contents).map_err(|e| MentionError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    Ok(config)
}

/// Saves the configuration to `config_path` using an atomic write.
///
/// Writes to a temporary file first and then renames it into place, so a
/// partial write never corrupts the configuration.
pub fn save_config(config_path: &Path, config: &MentionsConfig) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| MentionError::Config {
            message: format!(
                "failed to create config directory '{}': {}",
                parent.display(),
                e
            ),
        })?;
    }

    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| MentionError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| MentionError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, config_path).map_err(|e| MentionError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}
