pub mod error;
pub mod schema;

pub use error::*;
pub use schema::{Config, HetznerCredentials, HetznerInventoryConfig};

use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a configuration file
pub const CONFIG_PATH_ENV: &str = "HETZNERINV_CONFIG";

/// Look for a configuration file.
///
/// Search order:
/// 1. `HETZNERINV_CONFIG` environment variable (direct path)
/// 2. current directory: hetznerinv.local.yaml, hetznerinv.yaml, .hetznerinv.yaml
/// 3. `<config_dir>/hetznerinv/config.yaml` (global configuration)
///
/// Returns `Ok(None)` when nothing is found; built-in defaults apply then.
pub fn find_config_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        tracing::warn!(
            "{} points to {}, which does not exist",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    let current_dir = std::env::current_dir()?;
    let candidates = ["hetznerinv.local.yaml", "hetznerinv.yaml", ".hetznerinv.yaml"];
    for filename in &candidates {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("hetznerinv").join("config.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// Load the effective configuration.
///
/// An explicit `path` must exist. Without one the file is discovered via
/// [`find_config_file`]. `HETZNER_*` credential variables from the process
/// environment are applied last.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) if !p.exists() => return Err(ConfigError::ConfigNotFound(p.to_path_buf())),
        Some(p) => Some(p.to_path_buf()),
        None => find_config_file()?,
    };

    let mut config = match &path {
        Some(p) => {
            tracing::debug!("Loading configuration from {}", p.display());
            Config::from_file(p)?
        }
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    config
        .hetzner_credentials
        .apply_env_overrides(std::env::vars());
    Ok(config)
}
