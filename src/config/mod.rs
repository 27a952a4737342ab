//! Application configuration.
//!
//! Read from `config.toml` in the platform config directory. Every field has
//! a default, so a missing file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Overrides the shared container directory for every process that reads it.
pub const SHARED_CONTAINER_ENV: &str = "COUNTDOWN_SHARED_CONTAINER";

pub const DEFAULT_APP_GROUP: &str = "group.com.skydevz.CountDown";
pub const DEFAULT_APP_NAME: &str = "Countdown";
pub const DEFAULT_WIDGET_KIND: &str = "favEvents";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shared namespace the app and its widgets agree on
    pub app_group: String,
    /// Database file stem inside the container
    pub app_name: String,
    /// Explicit container directory, bypassing the platform data dir
    pub shared_container: Option<PathBuf>,
    /// How long a writer waits on another process's lock
    pub busy_timeout_ms: u64,
    /// Widget timeline kind reloaded after favorites change
    pub widget_kind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_group: DEFAULT_APP_GROUP.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            shared_container: None,
            busy_timeout_ms: 2_000,
            widget_kind: DEFAULT_WIDGET_KIND.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `<config_dir>/countdown/config.toml`, falling back to defaults
    /// when the platform has no config dir or the file is absent.
    pub fn load() -> Result<Self> {
        match project_dirs() {
            Some(dirs) => Self::load_from(&dirs.config_dir().join("config.toml")),
            None => {
                log::warn!("Unable to resolve project directories; using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Directory shared by the app and its widgets.
    ///
    /// Precedence: `COUNTDOWN_SHARED_CONTAINER`, then `shared_container`,
    /// then `<data_dir>/<app_group>`.
    pub fn container_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(SHARED_CONTAINER_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        if let Some(ref dir) = self.shared_container {
            return Ok(dir.clone());
        }

        let dirs = project_dirs().context("Failed to resolve the platform data directory")?;
        Ok(dirs.data_dir().join(&self.app_group))
    }

    /// Per-process file the legacy preferences lived in.
    pub fn legacy_preferences_path(&self) -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.preference_dir().join("preferences.toml"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "skydevz", "countdown")
}
