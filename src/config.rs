//! Configuration management module for loading and saving settings.

use crate::error::{MurmrError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for the murmr engine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Data storage configuration
    pub data: DataConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Flock visualization constants
    pub flock: FlockConfig,
}

/// Data storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataConfig {
    /// Snapshot file path override (absolute). Empty uses the XDG default.
    pub path: String,
}

/// Display-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency symbol for spending figures
    pub currency_symbol: String,
}

/// Flock visualization constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    /// Flock size shown before the first session is ever logged
    pub full_flock: u32,

    /// Birds earned per hour of streak
    pub birds_per_hour: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            currency_symbol: "$".to_string(),
        }
    }
}

impl Default for FlockConfig {
    fn default() -> Self {
        FlockConfig {
            full_flock: crate::population::FULL_FLOCK,
            birds_per_hour: crate::population::BIRDS_PER_HOUR,
        }
    }
}

// Configuration loading
impl Config {
    /// Load configuration from file, or use defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::find_config_file() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MurmrError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| MurmrError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| MurmrError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                MurmrError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, toml_string)
            .map_err(|e| MurmrError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Find config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check in order of priority:
        // 1. Environment variable
        if let Ok(path) = std::env::var("MURMR_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("murmr").join("config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Home directory
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir.join(".murmr.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Get default config file path (for creating new config)
    pub fn default_config_path() -> Result<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("murmr").join("config.toml"))
        } else {
            Err(MurmrError::Config(
                "Could not determine config directory".into(),
            ))
        }
    }

    /// Generate example config file content
    pub fn example_toml() -> &'static str {
        r#"# Murmr Configuration File
#
# All values shown are the defaults - you can override only what you need.

[data]
# Snapshot file path override (absolute). Empty uses the XDG default,
# e.g. ~/.local/share/murmr/events.json
path = ""

[display]
# Currency symbol for spending figures
currency_symbol = "$"

[flock]
# Flock size shown before the first session is ever logged
full_flock = 7200

# Birds earned per hour of streak
birds_per_hour = 10.0
"#
    }
}

// Global configuration instance
use std::sync::OnceLock;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration instance
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Config::default()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.flock.full_flock, 7200);
        assert_eq!(config.flock.birds_per_hour, 10.0);
        assert!(config.data.path.is_empty());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.flock.full_flock = 5000;
        config.save(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.flock.full_flock, 5000);
        assert_eq!(loaded.display.currency_symbol, "$");
    }

    #[test]
    fn test_example_config_parses() {
        let example = Config::example_toml();
        assert!(example.contains("Murmr Configuration"));

        let parsed: Config = toml::from_str(example).unwrap();
        assert_eq!(parsed.flock.full_flock, Config::default().flock.full_flock);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("[flock]\nbirds_per_hour = 2.5\n").unwrap();
        assert_eq!(parsed.flock.birds_per_hour, 2.5);
        assert_eq!(parsed.flock.full_flock, 7200);
        assert_eq!(parsed.display.currency_symbol, "$");
    }
}
