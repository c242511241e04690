//! Environment assignment
//!
//! Servers discovered on either provider are classified into a logical
//! environment by an ordered list of rules. The first rule whose conditions all
//! hold decides; later rules are never consulted.

use crate::error::{InventoryError, Result};
use crate::server::{ServerDescriptor, ServerId};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Environment label used when no rule matches and all hosts are requested
pub const DEFAULT_UNASSIGNED_ENVIRONMENT: &str = "unknown";

/// One configured classification rule.
///
/// Every condition that is set must hold for the rule to match. A rule without
/// any condition is rejected when the ruleset is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentRule {
    /// Environment assigned when the rule matches
    pub environment: String,

    /// Server name starts with this prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,

    /// Server name matches this regular expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_pattern: Option<String>,

    /// Server carries this label with exactly this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelMatch>,

    /// Server id is one of these
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_ids: Option<Vec<ServerId>>,

    /// Robot product or cloud server type equals this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

impl EnvironmentRule {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            ..Default::default()
        }
    }

    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    pub fn name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.label = Some(LabelMatch {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn server_ids(mut self, ids: Vec<ServerId>) -> Self {
        self.server_ids = Some(ids);
        self
    }

    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    fn has_condition(&self) -> bool {
        self.name_prefix.is_some()
            || self.name_pattern.is_some()
            || self.label.is_some()
            || self.server_ids.is_some()
            || self.product.is_some()
    }
}

/// Label equality condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMatch {
    pub key: String,
    pub value: String,
}

/// Result of classifying a server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentAssignment {
    pub environment: String,
}

impl std::fmt::Display for EnvironmentAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.environment)
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: EnvironmentRule,
    name_pattern: Option<Regex>,
}

impl CompiledRule {
    fn matches(&self, server: &ServerDescriptor) -> bool {
        let rule = &self.rule;

        if let Some(prefix) = &rule.name_prefix {
            if !server.name.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(pattern) = &self.name_pattern {
            if !pattern.is_match(&server.name) {
                return false;
            }
        }
        if let Some(label) = &rule.label {
            if server.labels.get(&label.key) != Some(&label.value) {
                return false;
            }
        }
        if let Some(ids) = &rule.server_ids {
            if !ids.contains(&server.id) {
                return false;
            }
        }
        if let Some(product) = &rule.product {
            if server.product != *product {
                return false;
            }
        }
        true
    }
}

/// Ordered, validated set of environment rules
#[derive(Debug, Clone)]
pub struct EnvironmentRuleset {
    rules: Vec<CompiledRule>,
    fallback: String,
}

impl Default for EnvironmentRuleset {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            fallback: DEFAULT_UNASSIGNED_ENVIRONMENT.to_string(),
        }
    }
}

impl EnvironmentRuleset {
    /// Validate rules and compile their patterns. Rule order is preserved.
    pub fn new(rules: Vec<EnvironmentRule>) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            if rule.environment.trim().is_empty() {
                return Err(InventoryError::InvalidRule {
                    environment: rule.environment,
                    message: "environment name is empty".to_string(),
                });
            }
            if !rule.has_condition() {
                return Err(InventoryError::InvalidRule {
                    environment: rule.environment,
                    message: "rule has no condition".to_string(),
                });
            }

            let name_pattern = match &rule.name_pattern {
                Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                    InventoryError::InvalidRule {
                        environment: rule.environment.clone(),
                        message: e.to_string(),
                    }
                })?),
                None => None,
            };

            compiled.push(CompiledRule { rule, name_pattern });
        }

        tracing::debug!("Compiled {} environment rules", compiled.len());
        Ok(Self {
            rules: compiled,
            ..Default::default()
        })
    }

    /// Label given to unmatched servers when all hosts are processed
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Classify one server.
    ///
    /// Returns `None` only when no rule matches and `process_all_hosts` is
    /// false; with `process_all_hosts` set every server gets an assignment.
    pub fn assign(
        &self,
        server: &ServerDescriptor,
        process_all_hosts: bool,
    ) -> Option<EnvironmentAssignment> {
        let matched = self
            .rules
            .iter()
            .find(|r| r.matches(server))
            .map(|r| r.rule.environment.clone());

        match matched {
            Some(environment) => Some(EnvironmentAssignment { environment }),
            None if process_all_hosts => Some(EnvironmentAssignment {
                environment: self.fallback.clone(),
            }),
            None => None,
        }
    }

    /// Classify a whole listing, ordered by server id.
    ///
    /// Servers without an assignment are left out.
    pub fn classify(
        &self,
        servers: impl IntoIterator<Item = ServerDescriptor>,
        process_all_hosts: bool,
    ) -> Vec<(ServerDescriptor, EnvironmentAssignment)> {
        let mut classified: Vec<_> = servers
            .into_iter()
            .filter_map(|server| {
                let assignment = self.assign(&server, process_all_hosts)?;
                Some((server, assignment))
            })
            .collect();

        classified.sort_by(|(a, _), (b, _)| a.id.cmp(&b.id));
        classified
    }
}
