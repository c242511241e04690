use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Could not parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Could not serialize configuration: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Invalid environment rules: {0}")]
    InvalidRules(#[from] hetznerinv_core::InventoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
