//! Desired-state loading
//!
//! Reads a previously generated Ansible-style inventory document and extracts,
//! for each host under `all.hosts`, the attributes the cloud sync cares about:
//!
//! ```yaml
//! all:
//!   hosts:
//!     web-1:
//!       name: web-1
//!       server_info:
//!         id: 100
//!         labels:
//!           role: web
//! ```
//!
//! Any other host variables are ignored. Host order follows the document.

use crate::error::{InventoryError, Result};
use crate::server::{Labels, ServerId};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CLOUD_INVENTORY_FILE: &str = "cloud.yaml";

/// Location of the cloud inventory for an environment
pub fn cloud_inventory_path(inventory_dir: impl AsRef<Path>, environment: &str) -> PathBuf {
    inventory_dir
        .as_ref()
        .join(environment)
        .join(CLOUD_INVENTORY_FILE)
}

/// Declared attributes of one inventory host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredHostState {
    /// Inventory host name (unique within the document)
    pub host_name: String,

    /// Server name the cloud should carry
    pub declared_name: Option<String>,

    /// Labels the cloud server should carry
    pub declared_labels: Option<Labels>,

    /// Cloud server this host maps to; hosts without one are not synced
    pub cloud_server_id: Option<ServerId>,
}

impl DesiredHostState {
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            declared_name: None,
            declared_labels: None,
            cloud_server_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.declared_name = Some(name.into());
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.declared_labels = Some(labels);
        self
    }

    pub fn with_server_id(mut self, id: impl Into<ServerId>) -> Self {
        self.cloud_server_id = Some(id.into());
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct HostEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    server_info: Option<ServerInfoEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerInfoEntry {
    #[serde(default)]
    id: Option<ServerId>,
    #[serde(default)]
    labels: Option<Labels>,
}

/// Load the desired state from an inventory file.
///
/// `kind` names the inventory in error messages (e.g. "Cloud").
pub fn load_desired_state(path: impl AsRef<Path>, kind: &str) -> Result<Vec<DesiredHostState>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(InventoryError::InventoryNotFound {
            kind: kind.to_string(),
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let hosts = parse_desired_state(&content, path, kind)?;
    tracing::debug!("Loaded {} hosts from {}", hosts.len(), path.display());
    Ok(hosts)
}

/// Parse inventory content; `path` is only used for error reporting.
pub fn parse_desired_state(
    content: &str,
    path: &Path,
    kind: &str,
) -> Result<Vec<DesiredHostState>> {
    let malformed = |message: String| InventoryError::MalformedInput {
        kind: kind.to_string(),
        path: path.to_path_buf(),
        message,
    };

    let document: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| malformed(e.to_string()))?;

    let hosts = document
        .get("all")
        .and_then(|all| all.get("hosts"))
        .and_then(|hosts| hosts.as_mapping())
        .ok_or_else(|| malformed("missing 'all.hosts' mapping".to_string()))?;

    if hosts.is_empty() {
        return Err(malformed("no hosts defined".to_string()));
    }

    let mut desired = Vec::with_capacity(hosts.len());
    for (key, value) in hosts {
        let host_name = key
            .as_str()
            .ok_or_else(|| malformed(format!("host key {:?} is not a string", key)))?
            .to_string();

        let entry: HostEntry = if value.is_null() {
            HostEntry::default()
        } else {
            serde_yaml::from_value(value.clone())
                .map_err(|e| malformed(format!("host '{}': {}", host_name, e)))?
        };

        let server_info = entry.server_info.unwrap_or_default();
        desired.push(DesiredHostState {
            host_name,
            declared_name: entry.name.filter(|n| !n.is_empty()),
            declared_labels: server_info.labels,
            cloud_server_id: server_info.id.map(ServerId::normalized),
        });
    }

    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(content: &str) -> Result<Vec<DesiredHostState>> {
        parse_desired_state(content, Path::new("cloud.yaml"), "Cloud")
    }

    #[test]
    fn test_parse_hosts_in_document_order() {
        let hosts = parse(
            r#"
all:
  hosts:
    zeta-1:
      ansible_host: 192.0.2.1
      name: zeta-1
      server_info:
        id: 100
        labels:
          role: web
    alpha-1:
      name: alpha-1
      server_info:
        id: "abc"
"#,
        )
        .unwrap();

        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].host_name, "zeta-1");
        assert_eq!(hosts[0].cloud_server_id, Some(ServerId::Number(100)));
        assert_eq!(
            hosts[0].declared_labels.as_ref().unwrap().get("role"),
            Some(&"web".to_string())
        );
        assert_eq!(hosts[1].host_name, "alpha-1");
        assert_eq!(hosts[1].cloud_server_id, Some(ServerId::Text("abc".into())));
        assert_eq!(hosts[1].declared_labels, None);
    }

    #[test]
    fn test_quoted_numeric_id_matches_cloud_id() {
        let hosts =
            parse("all:\n  hosts:\n    web-1:\n      server_info:\n        id: \"100\"\n").unwrap();
        assert_eq!(hosts[0].cloud_server_id, Some(ServerId::Number(100)));
    }

    #[test]
    fn test_host_without_server_info() {
        let hosts = parse("all:\n  hosts:\n    bare-1:\n    bare-2:\n      name: ''\n").unwrap();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0], DesiredHostState::new("bare-1"));
        assert_eq!(hosts[1].declared_name, None);
        assert_eq!(hosts[1].cloud_server_id, None);
    }

    #[test]
    fn test_empty_labels_are_declared() {
        let hosts =
            parse("all:\n  hosts:\n    web-1:\n      server_info:\n        id: 1\n        labels: {}\n")
                .unwrap();
        assert_eq!(hosts[0].declared_labels, Some(Labels::new()));
    }

    #[test]
    fn test_missing_hosts_is_malformed() {
        for content in ["", "all: {}\n", "foo: bar\n", "all:\n  hosts: {}\n"] {
            let err = parse(content).unwrap_err();
            assert!(
                matches!(err, InventoryError::MalformedInput { .. }),
                "expected malformed input for {:?}",
                content
            );
        }
    }

    #[test]
    fn test_bad_host_structure_is_malformed() {
        let err = parse("all:\n  hosts:\n    web-1:\n      server_info:\n        labels: [a, b]\n")
            .unwrap_err();
        assert!(err.to_string().contains("web-1"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = cloud_inventory_path(temp_dir.path(), "staging");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "all:\n  hosts:\n    web-1:\n      name: web-1\n      server_info:\n        id: 7\n",
        )
        .unwrap();

        let hosts = load_desired_state(&path, "Cloud").unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].declared_name.as_deref(), Some("web-1"));
        assert!(path.ends_with("staging/cloud.yaml"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempdir().unwrap();
        let err = load_desired_state(temp_dir.path().join("nope.yaml"), "Cloud").unwrap_err();
        assert!(matches!(err, InventoryError::InventoryNotFound { .. }));
        assert!(err.to_string().starts_with("Cloud inventory file"));
    }
}
