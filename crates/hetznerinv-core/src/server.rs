//! Provider-agnostic server snapshots

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Labels attached to a cloud server
pub type Labels = BTreeMap<String, String>;

/// Opaque server identifier.
///
/// Robot servers are numbered, cloud servers carry numeric ids as well, but
/// inventory documents may store them as strings. The two namespaces are
/// disjoint and never compared against each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerId {
    Number(u64),
    Text(String),
}

impl ServerId {
    /// Numeric text (`"100"`) becomes `Number(100)`; anything else is kept
    pub fn normalized(self) -> Self {
        match self {
            ServerId::Text(text) => match text.trim().parse::<u64>() {
                Ok(n) => ServerId::Number(n),
                Err(_) => ServerId::Text(text),
            },
            number => number,
        }
    }
}

impl std::fmt::Display for ServerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerId::Number(n) => write!(f, "{}", n),
            ServerId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for ServerId {
    fn from(id: u64) -> Self {
        ServerId::Number(id)
    }
}

impl From<&str> for ServerId {
    fn from(id: &str) -> Self {
        ServerId::Text(id.to_string())
    }
}

impl From<String> for ServerId {
    fn from(id: String) -> Self {
        ServerId::Text(id)
    }
}

/// Snapshot of a discovered server, built fresh on every listing call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    /// Provider-defined identifier
    pub id: ServerId,

    /// Server name as known by the provider
    pub name: String,

    /// Public IPv4 address, if any
    pub public_ipv4: Option<String>,

    /// Robot product name or cloud server type
    pub product: String,

    /// Cloud labels (always empty for bare-metal servers)
    #[serde(default)]
    pub labels: Labels,
}

impl ServerDescriptor {
    pub fn new(id: impl Into<ServerId>, name: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            public_ipv4: None,
            product: product.into(),
            labels: Labels::new(),
        }
    }

    pub fn with_public_ipv4(mut self, ip: impl Into<String>) -> Self {
        self.public_ipv4 = Some(ip.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Labels rendered as `k=v` pairs in key order
    pub fn labels_display(&self) -> String {
        self.labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Attributes to change on a cloud server in a single call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
}

impl ServerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.labels.is_none()
    }
}
