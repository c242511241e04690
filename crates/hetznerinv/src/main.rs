mod commands;
mod report;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hetznerinv")]
#[command(about = "A CLI tool for Hetzner Inventory.", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Show debug logs on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List servers from Hetzner Robot and Cloud
    List {
        /// Path to a custom YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Environment to list servers for (e.g., production, staging)
        #[arg(long, default_value = "production")]
        env: String,
    },
    /// Sync inventory data (names, labels) to Hetzner Cloud
    Sync {
        /// Path to a custom YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Environment to sync for (e.g., production, staging)
        #[arg(long, default_value = "production")]
        env: String,
        /// Sync server names from inventory to Hetzner Cloud
        #[arg(long)]
        names: bool,
        /// Sync server labels from inventory to Hetzner Cloud
        #[arg(long)]
        labels: bool,
        /// Cloud inventory file (default: <inventory_dir>/<env>/cloud.yaml)
        #[arg(short, long)]
        inventory: Option<PathBuf>,
    },
    /// Print the effective configuration as YAML
    DefaultConfig {
        /// Path to a custom YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show version information
    Version {
        /// Include system information
        #[arg(short, long)]
        all: bool,
        /// Output format (default: text, or json with --all)
        #[arg(short, long, value_enum)]
        output: Option<commands::version::OutputFormat>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout carries tables and YAML, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::List { config, env } => {
            commands::list::handle(config.as_deref(), &env).await?;
        }
        Commands::Sync {
            config,
            env,
            names,
            labels,
            inventory,
        } => {
            let summary =
                commands::sync::handle(config.as_deref(), &env, names, labels, inventory).await?;
            if summary.has_failures() {
                std::process::exit(1);
            }
        }
        Commands::DefaultConfig { config } => {
            commands::default_config::handle(config.as_deref())?;
        }
        Commands::Version { all, output } => {
            commands::version::handle(all, output)?;
        }
    }

    Ok(())
}
