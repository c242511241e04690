//! Hetzner Cloud provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HcloudError {
    #[error("Hetzner Cloud API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Invalid Hetzner Cloud server id: {0}")]
    InvalidServerId(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HcloudError>;
