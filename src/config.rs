use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub upload_description: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://photoslibrary.googleapis.com".to_string(),
            upload_description: "Uploaded via Chrome Extension".to_string(),
            request_timeout_secs: 120,
            log_level: "info".to_string(),
        }
    }
}

fn get_config_path() -> AppResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::config("Could not find config directory"))?
        .join("photosave");

    fs::create_dir_all(&config_dir)?;
    Ok(config_dir.join("config.json"))
}

/// Load the config file, creating it with defaults on first run.
///
/// The returned flag is true when the file did not exist before, which the
/// caller uses to distinguish a fresh install from a restart.
pub fn load_or_create() -> AppResult<(Config, bool)> {
    let path = get_config_path()?;

    if path.exists() {
        let contents = fs::read_to_string(&path)?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Invalid config file: {}", e)))?;
        Ok((config, false))
    } else {
        let config = Config::default();
        save(&config)?;
        Ok((config, true))
    }
}

pub fn save(config: &Config) -> AppResult<()> {
    let path = get_config_path()?;
    let contents = serde_json::to_string_pretty(config)?;
    fs::write(&path, contents)?;
    Ok(())
}
