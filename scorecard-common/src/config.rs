//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Service settings loaded from the TOML config file.
///
/// Every field is optional; missing values fall back to compiled defaults
/// (or, for the webhook, to "notifications disabled").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    /// Folder holding the database and any service-local state
    pub data_folder: Option<String>,
    /// Bind address for the HTTP listener, e.g. "127.0.0.1:5770"
    pub bind_addr: Option<String>,
    /// Webhook endpoint for per-person record digests; absent disables dispatch
    pub notify_webhook_url: Option<String>,
}

impl ServiceConfig {
    /// Load settings from a specific TOML file
    pub fn from_file(path: &Path) -> Result<ServiceConfig> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load settings from the platform config file if one exists,
    /// otherwise return defaults.
    pub fn load() -> ServiceConfig {
        match locate_config_file() {
            Some(path) => match ServiceConfig::from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config file: {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable config file: {}", e);
                    ServiceConfig::default()
                }
            },
            None => ServiceConfig::default(),
        }
    }
}

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(
    cli_arg: Option<&str>,
    env_var_name: &str,
    config: &ServiceConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(env_var_name) {
        return PathBuf::from(path);
    }

    if let Some(path) = &config.data_folder {
        return PathBuf::from(path);
    }

    default_data_folder()
}

/// Find the platform config file path, if present.
///
/// Linux checks `~/.config/scorecard/config.toml` then
/// `/etc/scorecard/config.toml`; macOS and Windows use the platform
/// config dir.
fn locate_config_file() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("scorecard").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/scorecard/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default data folder
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("scorecard"))
        .unwrap_or_else(|| PathBuf::from("./scorecard_data"))
}
