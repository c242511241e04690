use crate::report::ConsoleReporter;
use crate::utils;
use anyhow::Context;
use colored::Colorize;
use hetznerinv_core::{
    CloudProvider, SyncOptions, SyncSummary, cloud_inventory_path, live_index, load_desired_state,
    reconcile,
};
use std::path::{Path, PathBuf};

pub async fn handle(
    config_path: Option<&Path>,
    env: &str,
    names: bool,
    labels: bool,
    inventory: Option<PathBuf>,
) -> anyhow::Result<SyncSummary> {
    let config = utils::load_config(config_path)?;

    let options = SyncOptions {
        update_names: names || config.hetzner.update_server_names_in_cloud,
        update_labels: labels,
    };
    if options.is_empty() {
        anyhow::bail!("At least one of --names or --labels must be specified");
    }

    let cloud = utils::cloud_provider(&config, env)?;

    println!("Syncing inventory for environment: {}", env.cyan());

    let inventory_path =
        inventory.unwrap_or_else(|| cloud_inventory_path(&config.hetzner.inventory_dir, env));
    let desired = load_desired_state(&inventory_path, "Cloud")?;

    let live = live_index(
        cloud
            .list_servers()
            .await
            .context("Failed to list Hetzner Cloud servers")?,
    );
    tracing::debug!("{} live Cloud servers indexed", live.len());

    let mut reporter = ConsoleReporter::new();
    let outcomes = reconcile(&cloud, &desired, &live, options, &mut reporter).await;
    let summary = SyncSummary::from_outcomes(&outcomes);

    println!();
    if summary.has_failures() {
        println!("{} {}", "Sync process finished with errors:".red().bold(), summary);
    } else {
        println!("{} {}", "Sync process finished:".bright_green(), summary);
    }

    Ok(summary)
}
