//! Configuration loading
//!
//! A small TOML bootstrap file selects the rate schedule and bundled
//! subscription pricing. Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `FITLIC_CONFIG` environment variable
//! 3. `<user config dir>/fitlic/config.toml`
//! 4. No file: compiled defaults
//!
//! A missing file is never fatal: it is logged and defaults are used.
//! A file that exists but cannot be read or parsed is an error.

use crate::rates::RateSchedule;
use crate::scenarios::BundledOffer;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "FITLIC_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Rate schedule override (optional)
    ///
    /// If not specified, the built-in schedule is used. A relative path is
    /// taken relative to the config file's directory.
    #[serde(default)]
    pub rates_file: Option<PathBuf>,

    /// Bundled subscription pricing (optional)
    #[serde(default)]
    pub bundled: BundledConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bundled subscription pricing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundledConfig {
    /// Monthly subscription price; built-in default when absent
    #[serde(default)]
    pub monthly_price: Option<Decimal>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Rate schedule selected by this configuration
    ///
    /// Loads and validates `rates_file` when set, otherwise the built-in
    /// schedule.
    pub fn rate_schedule(&self) -> Result<RateSchedule> {
        match &self.rates_file {
            Some(path) => RateSchedule::from_toml_file(path),
            None => Ok(RateSchedule::current()),
        }
    }

    /// Bundled offer selected by this configuration
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for a negative monthly price.
    pub fn bundled_offer(&self) -> Result<BundledOffer> {
        match self.bundled.monthly_price {
            Some(price) if price < Decimal::ZERO => Err(Error::Config(format!(
                "bundled.monthly_price must not be negative (got {})",
                price
            ))),
            Some(price) => Ok(BundledOffer::new(price)),
            None => Ok(BundledOffer::default()),
        }
    }
}

/// Load configuration from `path`
///
/// A missing file logs a warning and returns defaults. A relative
/// `rates_file` is rebased onto the directory holding `path`.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file {} not found, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;
    let mut config = TomlConfig::from_toml_str(&content)?;
    config.rates_file = config.rates_file.map(|rates_file| match path.parent() {
        Some(config_dir) if rates_file.is_relative() => config_dir.join(rates_file),
        _ => rates_file,
    });

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Resolves which config file to load
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    env_var_name: String,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self {
            env_var_name: CONFIG_ENV_VAR.to_string(),
        }
    }

    /// Use a different environment variable (tests)
    pub fn with_env_var(env_var_name: impl Into<String>) -> Self {
        Self {
            env_var_name: env_var_name.into(),
        }
    }

    /// Resolve the config file path
    ///
    /// Returns `None` when no source names a file and the platform default
    /// does not exist.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Some(path.to_path_buf());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(&self.env_var_name) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config directory
        default_config_path().filter(|path| path.exists())
    }

    /// Resolve and load configuration, falling back to defaults
    pub fn load(&self, cli_arg: Option<&Path>) -> Result<TomlConfig> {
        match self.resolve(cli_arg) {
            Some(path) => load_toml_config(&path),
            None => {
                info!("No config file found, using built-in defaults");
                Ok(TomlConfig::default())
            }
        }
    }
}

/// `<user config dir>/fitlic/config.toml`, if the platform has one
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fitlic").join("config.toml"))
}
