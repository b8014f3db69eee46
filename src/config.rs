use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Directory holding canvas-sync state inside the download root.
const STATE_DIR: &str = ".canvas-sync";
/// Record store database filename.
const DB_FILE: &str = "state.db";
/// Config filename.
const CONFIG_FILE: &str = "config.toml";
/// Environment variable consulted for the API token.
pub const TOKEN_ENV: &str = "CANVAS_TOKEN";

/// Configuration resolved from the download root.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory downloads are written under.
    pub download_root: PathBuf,
    /// Path to the `.canvas-sync/` directory.
    pub state_dir: PathBuf,
    /// Path to the `SQLite` record store.
    pub db_path: PathBuf,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// User settings loaded from config.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from .canvas-sync/config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Remote API settings.
    pub api: ApiSettings,
    /// Sync behavior.
    pub sync: SyncSettings,
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// API base URL including the version prefix, without trailing slash.
    pub base_url: String,
    /// Bearer token. `--token` / `CANVAS_TOKEN` take precedence.
    pub token: Option<String>,
    /// Page size for the single file-listing request.
    pub per_page: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://oc.sjtu.edu.cn/api/v1".into(),
            token: None,
            per_page: 100,
            timeout_secs: 30,
        }
    }
}

/// Sync behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Top-level folder for a course's files. Defaults to the course ID.
    pub course_folder: Option<String>,
    /// Record files whose download failed, so they are not retried.
    pub record_failed_downloads: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            course_folder: None,
            record_failed_downloads: true,
        }
    }
}

impl Config {
    /// Create config for a given download root.
    pub fn new(download_root: impl Into<PathBuf>) -> Self {
        let download_root = download_root.into();
        let state_dir = download_root.join(STATE_DIR);
        let db_path = state_dir.join(DB_FILE);
        let config_path = state_dir.join(CONFIG_FILE);

        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            download_root,
            state_dir,
            db_path,
            config_path,
            settings,
        }
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| SyncError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    /// Load settings from config.toml if it exists.
    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!("ignoring invalid {}: {e}", config_path.display());
                None
            }
        }
    }

    /// Save current settings to config.toml.
    pub fn save_settings(&self) -> Result<()> {
        self.ensure_state_dir()?;
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| SyncError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Ensure the `.canvas-sync/` directory exists.
    pub fn ensure_state_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.state_dir)?;
        Ok(())
    }

    /// Folder name a course's files are placed under.
    #[must_use]
    pub fn course_folder(&self, course_id: u64) -> String {
        self.settings
            .sync
            .course_folder
            .clone()
            .unwrap_or_else(|| course_id.to_string())
    }

    /// Settings with the token masked, for display.
    #[must_use]
    pub fn redacted_settings(&self) -> UserSettings {
        let mut settings = self.settings.clone();
        if settings.api.token.is_some() {
            settings.api.token = Some("***".into());
        }
        settings
    }
}
