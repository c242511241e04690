//! Core error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the inventory core.
///
/// Per-host problems during a sync run (missing servers, rejected updates) are
/// never reported through this type; they become
/// [`SyncStatus`](crate::reconcile::SyncStatus) values instead.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("{kind} for environment '{environment}' not found in configuration")]
    ConfigurationMissing {
        kind: String,
        environment: String,
    },

    #[error("{kind} inventory file {path} not found")]
    InventoryNotFound { kind: String, path: PathBuf },

    #[error("{kind} inventory file {path} is empty or malformed: {message}")]
    MalformedInput {
        kind: String,
        path: PathBuf,
        message: String,
    },

    #[error("Invalid environment rule for '{environment}': {message}")]
    InvalidRule {
        environment: String,
        message: String,
    },

    #[error("API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InventoryError {
    pub fn configuration_missing(kind: impl Into<String>, environment: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            kind: kind.into(),
            environment: environment.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
