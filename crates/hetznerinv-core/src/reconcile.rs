//! Cloud sync reconciliation
//!
//! Compares each declared inventory host against the live cloud server with
//! the same id and pushes the minimal name/label update. Hosts are processed
//! strictly one after another in inventory order, with at most one provider
//! write per host. A failing host never stops the run: its error becomes a
//! [`SyncStatus::Failed`] outcome and the loop moves on.

use crate::inventory::DesiredHostState;
use crate::provider::CloudProvider;
use crate::server::{ServerDescriptor, ServerId, ServerUpdate};
use serde::Serialize;
use std::collections::HashMap;

/// Which attributes a sync run is allowed to change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    pub update_names: bool,
    pub update_labels: bool,
}

impl SyncOptions {
    pub fn is_empty(&self) -> bool {
        !self.update_names && !self.update_labels
    }
}

/// Final state of one host after a sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum SyncStatus {
    /// Live state already matches the inventory
    NoChange,
    /// Staged updates were accepted by the provider
    Applied,
    /// The declared server id does not exist in the cloud
    SkippedMissing,
    /// The provider rejected the update
    Failed(String),
}

impl SyncStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncStatus::Failed(_))
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::NoChange => write!(f, "No changes"),
            SyncStatus::Applied => write!(f, "Success"),
            SyncStatus::SkippedMissing => write!(f, "Not found"),
            SyncStatus::Failed(reason) => write!(f, "Error: {}", reason),
        }
    }
}

/// One row of a sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationOutcome {
    pub host_name: String,

    pub server_id: ServerId,

    /// Cloud name as listed before any update was attempted
    pub observed_cloud_name: Option<String>,

    /// Human-readable description of staged changes, in staging order
    pub actions: Vec<String>,

    pub status: SyncStatus,
}

impl ReconciliationOutcome {
    /// Actions joined for display, or `"None"`
    pub fn actions_display(&self) -> String {
        if self.actions.is_empty() {
            "None".to_string()
        } else {
            self.actions.join(", ")
        }
    }
}

/// Append-only consumer of outcomes, called once per host as it completes
pub trait ReportSink {
    fn report(&mut self, outcome: &ReconciliationOutcome);
}

impl ReportSink for Vec<ReconciliationOutcome> {
    fn report(&mut self, outcome: &ReconciliationOutcome) {
        self.push(outcome.clone());
    }
}

/// Changes needed to bring one live server in line with its inventory entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostDelta {
    pub update: ServerUpdate,
    pub actions: Vec<String>,
}

impl HostDelta {
    pub fn is_empty(&self) -> bool {
        self.update.is_empty()
    }
}

/// Compute the delta between a declared host and its live server
pub fn diff_host(
    desired: &DesiredHostState,
    live: &ServerDescriptor,
    options: SyncOptions,
) -> HostDelta {
    let mut delta = HostDelta::default();

    if options.update_names {
        if let Some(name) = &desired.declared_name {
            if *name != live.name {
                delta
                    .actions
                    .push(format!("Name: '{}' -> '{}'", live.name, name));
                delta.update.name = Some(name.clone());
            }
        }
    }

    if options.update_labels {
        if let Some(labels) = &desired.declared_labels {
            if *labels != live.labels {
                delta.actions.push("Labels updated".to_string());
                delta.update.labels = Some(labels.clone());
            }
        }
    }

    delta
}

/// Reconcile declared hosts against the live cloud state.
///
/// Hosts without a cloud server id are skipped silently. Every other host
/// yields exactly one outcome, reported to `sink` before the next host starts
/// and returned in inventory order.
pub async fn reconcile<P, S>(
    provider: &P,
    desired: &[DesiredHostState],
    live: &HashMap<ServerId, ServerDescriptor>,
    options: SyncOptions,
    sink: &mut S,
) -> Vec<ReconciliationOutcome>
where
    P: CloudProvider + ?Sized,
    S: ReportSink + ?Sized,
{
    let mut outcomes = Vec::with_capacity(desired.len());

    for host in desired {
        let Some(server_id) = &host.cloud_server_id else {
            tracing::debug!("Host {} has no cloud server id, skipping", host.host_name);
            continue;
        };

        let outcome = reconcile_host(provider, host, server_id, live, options).await;
        sink.report(&outcome);
        outcomes.push(outcome);
    }

    outcomes
}

async fn reconcile_host<P: CloudProvider + ?Sized>(
    provider: &P,
    host: &DesiredHostState,
    server_id: &ServerId,
    live: &HashMap<ServerId, ServerDescriptor>,
    options: SyncOptions,
) -> ReconciliationOutcome {
    let Some(server) = live.get(server_id) else {
        tracing::warn!(
            "Server with ID {} ({}) not found in {}, skipping",
            server_id,
            host.host_name,
            provider.name()
        );
        return ReconciliationOutcome {
            host_name: host.host_name.clone(),
            server_id: server_id.clone(),
            observed_cloud_name: None,
            actions: Vec::new(),
            status: SyncStatus::SkippedMissing,
        };
    };

    let delta = diff_host(host, server, options);
    let status = if delta.is_empty() {
        SyncStatus::NoChange
    } else {
        match provider.update_server(server_id, &delta.update).await {
            Ok(()) => {
                tracing::info!("Updated server {}: {}", server_id, delta.actions.join(", "));
                SyncStatus::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to update server {}: {}", server_id, e);
                SyncStatus::Failed(e.to_string())
            }
        }
    };

    ReconciliationOutcome {
        host_name: host.host_name.clone(),
        server_id: server_id.clone(),
        observed_cloud_name: Some(server.name.clone()),
        actions: delta.actions,
        status,
    }
}

/// Outcome counts of a sync run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub applied: usize,
    pub unchanged: usize,
    pub missing: usize,
    pub failed: usize,
}

impl SyncSummary {
    pub fn from_outcomes(outcomes: &[ReconciliationOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.status {
                SyncStatus::NoChange => summary.unchanged += 1,
                SyncStatus::Applied => summary.applied += 1,
                SyncStatus::SkippedMissing => summary.missing += 1,
                SyncStatus::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl std::fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} applied, {} unchanged, {} missing, {} failed",
            self.applied, self.unchanged, self.missing, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InventoryError, Result};
    use crate::provider::live_index;
    use crate::server::Labels;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory cloud that records update calls
    #[derive(Default)]
    struct FakeCloud {
        servers: Mutex<HashMap<ServerId, ServerDescriptor>>,
        fail_ids: Vec<ServerId>,
        calls: Mutex<Vec<(ServerId, ServerUpdate)>>,
    }

    impl FakeCloud {
        fn with_servers(servers: Vec<ServerDescriptor>) -> Self {
            Self {
                servers: Mutex::new(live_index(servers)),
                ..Default::default()
            }
        }

        fn failing_on(mut self, id: u64) -> Self {
            self.fail_ids.push(ServerId::Number(id));
            self
        }

        fn snapshot(&self) -> HashMap<ServerId, ServerDescriptor> {
            self.servers.lock().unwrap().clone()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CloudProvider for FakeCloud {
        fn name(&self) -> &str {
            "fake-cloud"
        }

        async fn list_servers(&self) -> Result<Vec<ServerDescriptor>> {
            Ok(self.servers.lock().unwrap().values().cloned().collect())
        }

        async fn update_server(&self, id: &ServerId, update: &ServerUpdate) -> Result<()> {
            self.calls.lock().unwrap().push((id.clone(), update.clone()));
            if self.fail_ids.contains(id) {
                return Err(InventoryError::Api("server is locked".to_string()));
            }
            let mut servers = self.servers.lock().unwrap();
            let server = servers
                .get_mut(id)
                .ok_or_else(|| InventoryError::Api("not found".to_string()))?;
            if let Some(name) = &update.name {
                server.name = name.clone();
            }
            if let Some(labels) = &update.labels {
                server.labels = labels.clone();
            }
            Ok(())
        }
    }

    fn sink() -> Vec<ReconciliationOutcome> {
        Vec::new()
    }

    fn labels(pairs: &[(&str, &str)]) -> Labels {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const NAMES: SyncOptions = SyncOptions {
        update_names: true,
        update_labels: false,
    };

    const ALL: SyncOptions = SyncOptions {
        update_names: true,
        update_labels: true,
    };

    #[tokio::test]
    async fn test_rename_is_applied() {
        let cloud = FakeCloud::with_servers(vec![ServerDescriptor::new(100u64, "old-name", "cx22")]);
        let desired = vec![
            DesiredHostState::new("web-1")
                .with_name("web-1")
                .with_server_id(100u64),
        ];

        let mut rows = sink();
        let outcomes = reconcile(&cloud, &desired, &cloud.snapshot(), NAMES, &mut rows).await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].host_name, "web-1");
        assert_eq!(outcomes[0].actions, vec!["Name: 'old-name' -> 'web-1'"]);
        assert_eq!(outcomes[0].status, SyncStatus::Applied);
        assert_eq!(outcomes[0].observed_cloud_name.as_deref(), Some("old-name"));
        assert_eq!(rows, outcomes);
        assert_eq!(cloud.call_count(), 1);
    }

    #[tokio::test]
    async fn test_quoted_inventory_id_reaches_live_server() {
        let cloud = FakeCloud::with_servers(vec![ServerDescriptor::new(100u64, "old-name", "cx22")]);
        let desired = crate::inventory::parse_desired_state(
            "all:\n  hosts:\n    web-1:\n      name: web-1\n      server_info:\n        id: \"100\"\n",
            std::path::Path::new("cloud.yaml"),
            "Cloud",
        )
        .unwrap();

        let mut rows = sink();
        let outcomes = reconcile(&cloud, &desired, &cloud.snapshot(), NAMES, &mut rows).await;

        assert_eq!(outcomes[0].status, SyncStatus::Applied);
        assert_eq!(outcomes[0].server_id, ServerId::Number(100));
        assert_eq!(cloud.snapshot()[&ServerId::Number(100)].name, "web-1");
    }

    #[tokio::test]
    async fn test_matching_name_is_no_change() {
        let cloud = FakeCloud::with_servers(vec![ServerDescriptor::new(100u64, "web-1", "cx22")]);
        let desired = vec![
            DesiredHostState::new("web-1")
                .with_name("web-1")
                .with_server_id(100u64),
        ];

        let outcomes = reconcile(&cloud, &desired, &cloud.snapshot(), NAMES, &mut sink()).await;

        assert_eq!(outcomes[0].status, SyncStatus::NoChange);
        assert!(outcomes[0].actions.is_empty());
        assert_eq!(outcomes[0].actions_display(), "None");
        assert_eq!(cloud.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_server_is_skipped_without_update() {
        let cloud = FakeCloud::with_servers(vec![ServerDescriptor::new(100u64, "web-1", "cx22")]);
        let desired = vec![
            DesiredHostState::new("ghost")
                .with_name("ghost")
                .with_server_id(999u64),
        ];

        let outcomes = reconcile(&cloud, &desired, &cloud.snapshot(), ALL, &mut sink()).await;

        assert_eq!(outcomes[0].status, SyncStatus::SkippedMissing);
        assert_eq!(outcomes[0].server_id, ServerId::Number(999));
        assert_eq!(outcomes[0].observed_cloud_name, None);
        assert_eq!(cloud.call_count(), 0);
    }

    #[tokio::test]
    async fn test_hosts_without_id_are_omitted() {
        let cloud = FakeCloud::with_servers(vec![ServerDescriptor::new(1u64, "a", "cx22")]);
        let desired = vec![
            DesiredHostState::new("robot-1").with_name("robot-1"),
            DesiredHostState::new("a").with_name("a").with_server_id(1u64),
        ];

        let outcomes = reconcile(&cloud, &desired, &cloud.snapshot(), ALL, &mut sink()).await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].host_name, "a");
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let cloud = FakeCloud::with_servers(vec![
            ServerDescriptor::new(1u64, "x1", "cx22"),
            ServerDescriptor::new(2u64, "x2", "cx22"),
            ServerDescriptor::new(3u64, "x3", "cx22"),
        ])
        .failing_on(2);
        let desired: Vec<_> = (1..=3u64)
            .map(|i| {
                DesiredHostState::new(format!("host-{}", i))
                    .with_name(format!("host-{}", i))
                    .with_server_id(i)
            })
            .collect();

        let outcomes = reconcile(&cloud, &desired, &cloud.snapshot(), NAMES, &mut sink()).await;

        let hosts: Vec<_> = outcomes.iter().map(|o| o.host_name.as_str()).collect();
        assert_eq!(hosts, vec!["host-1", "host-2", "host-3"]);
        assert_eq!(outcomes[0].status, SyncStatus::Applied);
        assert_eq!(
            outcomes[1].status,
            SyncStatus::Failed("API error: server is locked".to_string())
        );
        assert_eq!(outcomes[1].actions, vec!["Name: 'x2' -> 'host-2'"]);
        assert_eq!(outcomes[2].status, SyncStatus::Applied);
        assert_eq!(cloud.call_count(), 3);

        let summary = SyncSummary::from_outcomes(&outcomes);
        assert!(summary.has_failures());
        assert_eq!(summary.to_string(), "2 applied, 0 unchanged, 0 missing, 1 failed");
    }

    #[tokio::test]
    async fn test_labels_compared_as_sets() {
        let cloud = FakeCloud::with_servers(vec![
            ServerDescriptor::new(1u64, "a", "cx22").with_labels(labels(&[("b", "2"), ("a", "1")])),
            ServerDescriptor::new(2u64, "b", "cx22").with_labels(labels(&[("a", "1")])),
        ]);
        let desired = vec![
            DesiredHostState::new("a")
                .with_labels(labels(&[("a", "1"), ("b", "2")]))
                .with_server_id(1u64),
            DesiredHostState::new("b")
                .with_labels(labels(&[("a", "1"), ("extra", "x")]))
                .with_server_id(2u64),
        ];

        let options = SyncOptions {
            update_names: false,
            update_labels: true,
        };
        let outcomes = reconcile(&cloud, &desired, &cloud.snapshot(), options, &mut sink()).await;

        assert_eq!(outcomes[0].status, SyncStatus::NoChange);
        assert_eq!(outcomes[1].status, SyncStatus::Applied);
        assert_eq!(outcomes[1].actions, vec!["Labels updated"]);
    }

    #[tokio::test]
    async fn test_combined_update_is_one_call() {
        let cloud = FakeCloud::with_servers(vec![ServerDescriptor::new(5u64, "old", "cx22")]);
        let desired = vec![
            DesiredHostState::new("new")
                .with_name("new")
                .with_labels(labels(&[("role", "db")]))
                .with_server_id(5u64),
        ];

        let outcomes = reconcile(&cloud, &desired, &cloud.snapshot(), ALL, &mut sink()).await;

        assert_eq!(
            outcomes[0].actions,
            vec!["Name: 'old' -> 'new'", "Labels updated"]
        );
        let calls = cloud.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.name.as_deref(), Some("new"));
        assert_eq!(calls[0].1.labels, Some(labels(&[("role", "db")])));
    }

    #[test]
    fn test_disabled_options_stage_nothing() {
        let live = ServerDescriptor::new(1u64, "old", "cx22");
        let desired = DesiredHostState::new("new")
            .with_name("new")
            .with_labels(labels(&[("k", "v")]))
            .with_server_id(1u64);

        assert!(diff_host(&desired, &live, SyncOptions::default()).is_empty());
        assert!(SyncOptions::default().is_empty());

        let undeclared = DesiredHostState::new("new").with_server_id(1u64);
        assert!(diff_host(&undeclared, &live, ALL).is_empty());
    }

    #[test]
    fn test_second_run_is_no_op() {
        tokio_test::block_on(async {
            let cloud = FakeCloud::with_servers(vec![
                ServerDescriptor::new(1u64, "old-1", "cx22"),
                ServerDescriptor::new(2u64, "db-1", "cx22").with_labels(labels(&[("role", "db")])),
            ]);
            let desired = vec![
                DesiredHostState::new("web-1")
                    .with_name("web-1")
                    .with_labels(Labels::new())
                    .with_server_id(1u64),
                DesiredHostState::new("db-1")
                    .with_name("db-1")
                    .with_labels(labels(&[("role", "db")]))
                    .with_server_id(2u64),
            ];

            let first = reconcile(&cloud, &desired, &cloud.snapshot(), ALL, &mut sink()).await;
            assert_eq!(first[0].status, SyncStatus::Applied);
            assert_eq!(first[1].status, SyncStatus::NoChange);

            let second = reconcile(&cloud, &desired, &cloud.snapshot(), ALL, &mut sink()).await;
            let third = reconcile(&cloud, &desired, &cloud.snapshot(), ALL, &mut sink()).await;
            assert!(second.iter().all(|o| o.status == SyncStatus::NoChange));
            assert_eq!(second, third);
        });
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SyncStatus::Applied.to_string(), "Success");
        assert_eq!(SyncStatus::NoChange.to_string(), "No changes");
        assert_eq!(SyncStatus::Failed("boom".into()).to_string(), "Error: boom");
        assert!(SyncStatus::Failed(String::new()).is_failure());
    }
}
