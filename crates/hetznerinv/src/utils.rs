use anyhow::Context;
use colored::Colorize;
use hetznerinv_config::Config;
use hetznerinv_core::InventoryError;
use hetznerinv_hcloud::{HcloudClient, HcloudProvider};
use hetznerinv_robot::{RobotClient, RobotProvider};
use std::path::Path;

/// Missing Robot credentials abort only this environment
pub const PRODUCTION_ENVIRONMENT: &str = "production";

/// Load the configuration, explicit path or discovered
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(p) => hetznerinv_config::load_config(Some(p))
            .with_context(|| format!("Failed to load configuration from {}", p.display()))?,
        None => hetznerinv_config::load_config(None).context("Failed to load configuration")?,
    };
    Ok(config)
}

/// Build the Hetzner Cloud provider for an environment.
///
/// A missing token is always fatal.
pub fn cloud_provider(config: &Config, env: &str) -> anyhow::Result<HcloudProvider> {
    let token = config
        .hetzner_credentials
        .hcloud()
        .require("Hetzner Cloud token", env)
        .with_context(|| {
            format!(
                "Please set HETZNER_HCLOUD_TOKEN or HETZNER_HCLOUD_TOKENS_{} in your config/environment",
                env.to_uppercase()
            )
        })?;

    let client = HcloudClient::new(token).with_base_url(&config.hetzner.hcloud_api_url);
    Ok(HcloudProvider::from_client(client))
}

/// Build the Hetzner Robot provider for an environment.
///
/// Missing credentials are fatal for production; elsewhere a warning is
/// printed and `None` returned so the Robot listing is skipped.
pub fn robot_provider(config: &Config, env: &str) -> anyhow::Result<Option<RobotProvider>> {
    let creds = &config.hetzner_credentials;
    let credentials = creds
        .robot_user()
        .require("Hetzner Robot user", env)
        .and_then(|user| {
            let password = creds
                .robot_password()
                .require("Hetzner Robot password", env)?;
            Ok((user, password))
        });

    match credentials {
        Ok((user, password)) => {
            let client =
                RobotClient::new(user, password).with_base_url(&config.hetzner.robot_api_url);
            Ok(Some(RobotProvider::from_client(client)))
        }
        Err(_) => {
            let err = InventoryError::configuration_missing(
                "Hetzner Robot credentials (user, password)",
                env,
            );
            if env == PRODUCTION_ENVIRONMENT {
                return Err(err.into());
            }
            eprintln!("{} {}", "Error:".red().bold(), err);
            eprintln!(
                "{}",
                "Warning: Robot credentials not found, Robot inventory will be skipped.".yellow()
            );
            Ok(None)
        }
    }
}
