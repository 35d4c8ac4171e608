//! Runtime configuration.
//!
//! Read from an optional JSON file in the per-user config directory. A
//! missing file means defaults; an unreadable or malformed file is a startup
//! error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Default port for the local callback listener.
pub const DEFAULT_PORT: u16 = 8742;

const CONFIG_FILE: &str = "callback.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the listener binds on. Loopback only in practice.
    pub bind_addr: String,
    pub port: u16,
    /// Request path the login redirect lands on.
    pub callback_path: String,
    /// Token storage backend, `"sqlite"` or `"keyring"`.
    pub store_backend: String,
    /// Overrides the default database location of the sqlite backend.
    pub db_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            callback_path: "/naver-callback.html".to_string(),
            store_backend: "sqlite".to_string(),
            db_path: None,
        }
    }
}

impl AppConfig {
    /// Load the config file from the per-user config directory, falling back
    /// to defaults when it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        match project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE)) {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "example", "basicboard2")
}
