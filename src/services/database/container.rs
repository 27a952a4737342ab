//! Shared container resolution.
//!
//! The app and each widget process locate the same directory from the same
//! configuration and open the same database file inside it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::AppConfig;

use super::error::{StoreError, StoreResult};
use super::{open_shared_database, SharedDatabase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedContainer {
    root: PathBuf,
    app_name: String,
}

impl SharedContainer {
    pub fn new(root: impl Into<PathBuf>, app_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            app_name: app_name.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> StoreResult<Self> {
        let root = config
            .container_dir()
            .map_err(|err| StoreError::StorageUnavailable {
                path: PathBuf::from(&config.app_group),
                reason: format!("{:#}", err),
            })?;
        Ok(Self::new(root, config.app_name.clone()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(format!("{}.sqlite", self.app_name))
    }

    /// Where timeline reload stamps are written for widget processes.
    pub fn timelines_dir(&self) -> PathBuf {
        self.root.join("timelines")
    }

    /// Creates the container directory on first use.
    pub fn ensure_exists(&self) -> StoreResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|err| StoreError::StorageUnavailable {
            path: self.root.clone(),
            reason: err.to_string(),
        })
    }

    pub fn open_database(&self, busy_timeout: Duration) -> StoreResult<SharedDatabase> {
        self.ensure_exists()?;
        open_shared_database(&self.database_path(), busy_timeout)
    }
}
