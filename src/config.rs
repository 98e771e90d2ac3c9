use crate::errors::{NoesisError, NoesisResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, sync::RwLock};

/// Name of the environment variable that overrides the configured API base
/// URL. Loaded after `.env` so a project-local dotenv file works too.
pub const API_URL_ENV: &str = "NOESIS_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the learning-platform backend. Every endpoint is joined
    /// onto this; there are no per-feature base URLs.
    pub api_base_url: String,
    pub log_level: String,
    /// When true, every API call is logged with endpoint, status and
    /// elapsed milliseconds.
    pub request_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            log_level: "info".to_string(),
            request_log: true,
        }
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

pub fn initialize_config() -> NoesisResult<()> {
    let config_path = get_config_path()?;

    let mut config = if config_path.exists() {
        let config_str = fs::read_to_string(&config_path).map_err(|e| {
            NoesisError::config_error(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&config_str)
            .map_err(|e| NoesisError::config_error(format!("Failed to parse config: {}", e)))?
    } else {
        let config = Config::default();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                NoesisError::config_error(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config_str = serde_json::to_string_pretty(&config).map_err(|e| {
            NoesisError::config_error(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&config_path, config_str).map_err(|e| {
            NoesisError::config_error(format!("Failed to write config file: {}", e))
        })?;

        config
    };

    // Environment wins over the file.
    if let Ok(url) = env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api_base_url = url;
        }
    }

    validate_config(&config)?;

    *CONFIG.write().unwrap() = config;

    Ok(())
}

fn get_config_path() -> NoesisResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| NoesisError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("noesis").join("config.json"))
}

fn validate_config(config: &Config) -> NoesisResult<()> {
    if config.api_base_url.trim().is_empty() {
        return Err(NoesisError::config_error("api_base_url is required"));
    }

    if !config.api_base_url.starts_with("http://") && !config.api_base_url.starts_with("https://") {
        return Err(NoesisError::config_error(
            "api_base_url must start with http:// or https://",
        ));
    }

    let level = config.log_level.to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => {}
        _ => {
            return Err(NoesisError::config_error(format!(
                "Unknown log level: {}",
                config.log_level
            )))
        }
    }

    Ok(())
}

pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_config_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_empty_base_url() {
        let mut config = Config::default();
        config.api_base_url = "".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_bad_scheme() {
        let mut config = Config::default();
        config.api_base_url = "localhost:5000".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_bad_log_level() {
        let mut config = Config::default();
        config.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.api_base_url = "https://learn.example.com".to_string();
        config.request_log = false;

        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        let loaded: Config = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(loaded.api_base_url, "https://learn.example.com");
        assert!(!loaded.request_log);
        assert_eq!(loaded.log_level, "info");
    }
}
