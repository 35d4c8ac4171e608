//! Persistent token storage backends.
//!
//! Each backend implements the [`TokenStore`](crate::callback::TokenStore)
//! seam; the backend is selected by name from config.

pub mod keyring;
pub mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::callback::TokenStore;
use crate::config::{self, AppConfig};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("credential store error: {0}")]
    Keyring(#[from] ::keyring::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no user data directory available")]
    NoDataDir,

    #[error("unknown store backend: {0}")]
    UnknownBackend(String),
}

/// Open the backend named in config.
pub fn open(config: &AppConfig) -> Result<Arc<dyn TokenStore + Send + Sync>, StoreError> {
    match config.store_backend.as_str() {
        "sqlite" => {
            let store = sqlite::SqliteStore::open(resolve_db_path(config)?)?;
            Ok(Arc::new(store))
        }
        "keyring" => Ok(Arc::new(keyring::KeyringStore::new())),
        other => Err(StoreError::UnknownBackend(other.to_string())),
    }
}

fn resolve_db_path(config: &AppConfig) -> Result<PathBuf, StoreError> {
    if let Some(path) = &config.db_path {
        return Ok(path.clone());
    }
    let dirs = config::project_dirs().ok_or(StoreError::NoDataDir)?;
    std::fs::create_dir_all(dirs.data_dir())?;
    Ok(dirs.data_dir().join("tokens.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backend_is_rejected() {
        let config = AppConfig {
            store_backend: "redis".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            open(&config),
            Err(StoreError::UnknownBackend(name)) if name == "redis"
        ));
    }

    #[test]
    fn explicit_db_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.db");
        let config = AppConfig {
            db_path: Some(path.clone()),
            ..AppConfig::default()
        };
        assert_eq!(resolve_db_path(&config).unwrap(), path);
    }
}
