//! Common error types for FITLIC
//!
//! Fee calculation itself never fails; these errors only surface at the
//! edges where configuration, rate schedules or raw input are loaded.

use thiserror::Error;

/// Common result type for FITLIC operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration or rate schedules
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML document
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Rate schedule failed structural validation
    #[error("Invalid rate schedule: {0}")]
    InvalidRateSchedule(String),

    /// Invalid facility input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
