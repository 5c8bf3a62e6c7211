use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use lazy_static::lazy_static;
use crate::error::TutorError;

const APP_DIR: &str = "com.planmaker.app";
const CONFIG_FILE: &str = "planmaker.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storage root; defaults to `<app data>/data`
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub suggestion_cache_size: usize,
    /// Class records shown in a student's history before "show more"
    pub record_page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: None,
            log_level: "info".to_string(),
            suggestion_cache_size: 64,
            record_page_size: 5,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, TutorError> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.suggestion_cache_size = config.suggestion_cache_size.max(1);
        Ok(config)
    }

    /// Directory the database lives in
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| app_data_dir().join("data"))
    }
}

/// Platform-specific application data directory
pub fn app_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push("Library/Application Support");
            dir.push(APP_DIR);
            return dir;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            let mut dir = PathBuf::from(appdata);
            dir.push(APP_DIR);
            return dir;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut dir = PathBuf::from(home);
            dir.push(".local/share");
            dir.push(APP_DIR);
            return dir;
        }
    }

    // Fallback
    PathBuf::from(".")
}

fn load_app_config_internal() -> AppConfig {
    let config_path = app_data_dir().join(CONFIG_FILE);

    match fs::read_to_string(&config_path) {
        Ok(content) => match AppConfig::from_toml_str(&content) {
            Ok(config) => {
                tracing::info!(path = ?config_path, "Loaded app config");
                config
            }
            Err(e) => {
                tracing::warn!(path = ?config_path, error = %e, "Failed to parse config, using defaults");
                AppConfig::default()
            }
        },
        Err(_) => {
            tracing::debug!(path = ?config_path, "No config file, using defaults");
            AppConfig::default()
        }
    }
}

lazy_static! {
    static ref APP_CONFIG: AppConfig = load_app_config_internal();
}

/// Get the cached app configuration (loaded once on first use)
pub fn get_app_config() -> &'static AppConfig {
    &APP_CONFIG
}
