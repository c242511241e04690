use crate::report;
use crate::utils;
use anyhow::Context;
use colored::Colorize;
use hetznerinv_core::{BareMetalProvider, CloudProvider};
use std::path::Path;

pub async fn handle(config_path: Option<&Path>, env: &str) -> anyhow::Result<()> {
    let config = utils::load_config(config_path)?;
    println!("Listing servers for environment: {}", env.cyan());

    let robot = utils::robot_provider(&config, env)?;
    let cloud = utils::cloud_provider(&config, env)?;
    let ruleset = config
        .hetzner
        .ruleset()
        .context("Invalid environment rules in configuration")?;

    let robot_listing = async {
        match &robot {
            Some(provider) => provider.list_servers().await.map(Some),
            None => Ok(None),
        }
    };
    let (robot_servers, cloud_servers) = tokio::join!(robot_listing, cloud.list_servers());

    if let Some(servers) = robot_servers.context("Failed to list Hetzner Robot servers")? {
        let classified = ruleset.classify(servers, true);
        report::print_robot_servers(&classified);
    }

    let mut cloud_servers = cloud_servers.context("Failed to list Hetzner Cloud servers")?;
    cloud_servers.sort_by(|a, b| a.id.cmp(&b.id));
    report::print_cloud_servers(env, &cloud_servers);

    Ok(())
}
