//! Console tables for listings and sync results

use colored::Colorize;
use hetznerinv_core::{
    EnvironmentAssignment, ReconciliationOutcome, ReportSink, ServerDescriptor, SyncStatus,
};

fn title(text: &str) {
    println!();
    println!("{}", text.magenta().bold());
}

fn rule(width: usize) {
    println!("{}", "─".repeat(width).dimmed());
}

pub fn print_robot_servers(servers: &[(ServerDescriptor, EnvironmentAssignment)]) {
    title("Hetzner Robot Servers");
    if servers.is_empty() {
        println!("{}", "No Robot servers found".dimmed());
        return;
    }

    println!(
        "{}",
        format!(
            "{:<10} {:<28} {:<16} {:<16} {}",
            "ID", "Name", "Public IP", "Product", "Assigned Env"
        )
        .bold()
    );
    rule(90);

    for (server, assignment) in servers {
        println!(
            "{:<10} {:<28} {:<16} {:<16} {}",
            server.id.to_string(),
            server.name,
            server.public_ipv4.as_deref().unwrap_or("-").cyan(),
            server.product,
            assignment.to_string().green()
        );
    }
}

pub fn print_cloud_servers(env: &str, servers: &[ServerDescriptor]) {
    title(&format!("Hetzner Cloud Servers ({})", env));
    if servers.is_empty() {
        println!("{}", "No Cloud servers found".dimmed());
        return;
    }

    println!(
        "{}",
        format!(
            "{:<10} {:<28} {:<16} {:<10} {}",
            "ID", "Name", "Public IP", "Type", "Labels"
        )
        .bold()
    );
    rule(90);

    for server in servers {
        println!(
            "{:<10} {:<28} {:<16} {:<10} {}",
            server.id.to_string(),
            server.name,
            server.public_ipv4.as_deref().unwrap_or("-").cyan(),
            server.product,
            server.labels_display().blue()
        );
    }
}

/// Prints one row per host as soon as the reconciler reports it
#[derive(Default)]
pub struct ConsoleReporter {
    header_printed: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn header(&mut self) {
        if self.header_printed {
            return;
        }
        title("Hetzner Cloud Sync");
        println!(
            "{}",
            format!(
                "{:<10} {:<24} {:<24} {:<40} {}",
                "ID", "Inventory Name", "Cloud Name", "Action", "Status"
            )
            .bold()
        );
        rule(110);
        self.header_printed = true;
    }
}

impl ReportSink for ConsoleReporter {
    fn report(&mut self, outcome: &ReconciliationOutcome) {
        self.header();

        let status = match &outcome.status {
            SyncStatus::Applied => outcome.status.to_string().green(),
            SyncStatus::NoChange => outcome.status.to_string().normal(),
            SyncStatus::SkippedMissing => outcome.status.to_string().yellow(),
            SyncStatus::Failed(_) => outcome.status.to_string().red(),
        };

        println!(
            "{:<10} {:<24} {:<24} {:<40} {}",
            outcome.server_id.to_string(),
            outcome.host_name,
            outcome.observed_cloud_name.as_deref().unwrap_or("-"),
            outcome.actions_display(),
            status
        );
    }
}
