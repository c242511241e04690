//! Per-environment credential resolution
//!
//! Every secret kind (cloud token, robot user, robot password) is configured as
//! an optional default plus a map of per-environment overrides. An override
//! whose key is present always wins, even when its value is an empty string or
//! explicitly null; only a missing key falls back to the default.

use crate::error::{InventoryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolve one secret for `environment`.
pub fn resolve<'a>(
    default: Option<&'a str>,
    per_environment: &'a BTreeMap<String, Option<String>>,
    environment: &str,
) -> Option<&'a str> {
    match per_environment.get(environment) {
        Some(value) => value.as_deref(),
        None => default,
    }
}

/// Fail with `ConfigurationMissing` unless a usable secret was resolved.
///
/// An empty string counts as missing here: it is a valid resolution result but
/// never a usable secret.
pub fn require<'a>(resolved: Option<&'a str>, kind: &str, environment: &str) -> Result<&'a str> {
    match resolved {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(InventoryError::configuration_missing(kind, environment)),
    }
}

/// Default secret plus per-environment overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
    /// Used when no override exists for the environment
    #[serde(default)]
    pub default: Option<String>,

    /// Explicit per-environment values
    #[serde(default)]
    pub per_environment: BTreeMap<String, Option<String>>,
}

impl CredentialSet {
    pub fn new(default: Option<String>) -> Self {
        Self {
            default,
            per_environment: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, environment: impl Into<String>, value: Option<String>) -> Self {
        self.per_environment.insert(environment.into(), value);
        self
    }

    pub fn resolve(&self, environment: &str) -> Option<&str> {
        resolve(self.default.as_deref(), &self.per_environment, environment)
    }

    pub fn require(&self, kind: &str, environment: &str) -> Result<&str> {
        require(self.resolve(environment), kind, environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_only() {
        let creds = CredentialSet::new(Some("default_token".to_string()));
        assert_eq!(creds.resolve("production"), Some("default_token"));
        assert_eq!(creds.resolve("staging"), Some("default_token"));
    }

    #[test]
    fn test_override_only() {
        let creds = CredentialSet::default().with_override("production", Some("prod_token".into()));
        assert_eq!(creds.resolve("production"), Some("prod_token"));
        assert_eq!(creds.resolve("staging"), None);
    }

    #[test]
    fn test_override_takes_precedence() {
        let creds = CredentialSet::new(Some("default_token".to_string()))
            .with_override("production", Some("prod_token".into()));
        assert_eq!(creds.resolve("production"), Some("prod_token"));
        assert_eq!(creds.resolve("staging"), Some("default_token"));
    }

    #[test]
    fn test_override_for_other_environment() {
        let creds = CredentialSet::new(Some("default_token".to_string()))
            .with_override("development", Some("dev_token".into()));
        assert_eq!(creds.resolve("production"), Some("default_token"));
        assert_eq!(creds.resolve("development"), Some("dev_token"));
    }

    #[test]
    fn test_nothing_set() {
        let creds = CredentialSet::default();
        assert_eq!(creds.resolve("production"), None);
    }

    #[test]
    fn test_empty_override_is_still_set() {
        let creds = CredentialSet::new(Some("default_token".to_string()))
            .with_override("production", Some(String::new()));
        assert_eq!(creds.resolve("production"), Some(""));
        assert_eq!(creds.resolve("staging"), Some("default_token"));
    }

    #[test]
    fn test_null_override_does_not_fall_back() {
        let creds =
            CredentialSet::new(Some("default_token".to_string())).with_override("production", None);
        assert_eq!(creds.resolve("production"), None);
    }

    #[test]
    fn test_require_rejects_missing_and_empty() {
        let creds = CredentialSet::default().with_override("production", Some(String::new()));

        let err = creds.require("Hetzner Cloud token", "production").unwrap_err();
        assert!(matches!(err, InventoryError::ConfigurationMissing { .. }));
        assert!(err.to_string().contains("'production'"));

        assert!(creds.require("Hetzner Cloud token", "staging").is_err());
    }

    #[test]
    fn test_require_returns_value() {
        let creds = CredentialSet::new(Some("tok".to_string()));
        assert_eq!(creds.require("Hetzner Cloud token", "staging").unwrap(), "tok");
    }
}
