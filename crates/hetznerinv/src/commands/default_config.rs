use crate::utils;
use std::path::Path;

/// Print defaults merged with the configuration file (if any)
pub fn handle(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = utils::load_config(config_path)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
