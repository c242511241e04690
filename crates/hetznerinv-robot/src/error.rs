//! Hetzner Robot provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RobotError {
    #[error("Hetzner Robot authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Hetzner Robot API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RobotError>;
