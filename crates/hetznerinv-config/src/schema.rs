//! Configuration schema and defaults

use crate::error::{ConfigError, Result};
use hetznerinv_core::CredentialSet;
use hetznerinv_core::{DEFAULT_UNASSIGNED_ENVIRONMENT, EnvironmentRule, EnvironmentRuleset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_NAME: &str = "hetznerinv";
pub const DEFAULT_HCLOUD_API_URL: &str = "https://api.hetzner.cloud/v1";
pub const DEFAULT_ROBOT_API_URL: &str = "https://robot-ws.your-server.de";

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub name: String,
    pub hetzner_credentials: HetznerCredentials,
    pub hetzner: HetznerInventoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            hetzner_credentials: HetznerCredentials::default(),
            hetzner: HetznerInventoryConfig::default(),
        }
    }
}

impl Config {
    /// Read a YAML file; keys missing from the file keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content, path)
    }

    /// Parse YAML content; `path` is only used for error reporting
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Robot and Cloud API credentials.
///
/// One [`CredentialSet`] per secret kind; see [`hetznerinv_core::credentials`]
/// for the precedence rule. On disk each set is a flat pair of keys, e.g.
/// `hcloud_token` (default) and `hcloud_tokens` (per-environment overrides).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CredentialsFile", into = "CredentialsFile")]
pub struct HetznerCredentials {
    pub hcloud: CredentialSet,
    pub robot_user: CredentialSet,
    pub robot_password: CredentialSet,
}

/// YAML layout of [`HetznerCredentials`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CredentialsFile {
    robot_user: Option<String>,
    robot_password: Option<String>,
    robot_users: BTreeMap<String, Option<String>>,
    robot_passwords: BTreeMap<String, Option<String>>,
    hcloud_token: Option<String>,
    hcloud_tokens: BTreeMap<String, Option<String>>,
}

impl From<CredentialsFile> for HetznerCredentials {
    fn from(file: CredentialsFile) -> Self {
        Self {
            hcloud: CredentialSet {
                default: file.hcloud_token,
                per_environment: file.hcloud_tokens,
            },
            robot_user: CredentialSet {
                default: file.robot_user,
                per_environment: file.robot_users,
            },
            robot_password: CredentialSet {
                default: file.robot_password,
                per_environment: file.robot_passwords,
            },
        }
    }
}

impl From<HetznerCredentials> for CredentialsFile {
    fn from(creds: HetznerCredentials) -> Self {
        Self {
            robot_user: creds.robot_user.default,
            robot_password: creds.robot_password.default,
            robot_users: creds.robot_user.per_environment,
            robot_passwords: creds.robot_password.per_environment,
            hcloud_token: creds.hcloud.default,
            hcloud_tokens: creds.hcloud.per_environment,
        }
    }
}

impl HetznerCredentials {
    pub fn hcloud(&self) -> &CredentialSet {
        &self.hcloud
    }

    pub fn robot_user(&self) -> &CredentialSet {
        &self.robot_user
    }

    pub fn robot_password(&self) -> &CredentialSet {
        &self.robot_password
    }

    pub fn get_hcloud_token(&self, environment: &str) -> Option<&str> {
        self.hcloud.resolve(environment)
    }

    /// Robot user and password, each resolved independently
    pub fn get_robot_credentials(&self, environment: &str) -> (Option<&str>, Option<&str>) {
        (
            self.robot_user.resolve(environment),
            self.robot_password.resolve(environment),
        )
    }

    /// Apply `HETZNER_*` overrides.
    ///
    /// `HETZNER_HCLOUD_TOKEN`, `HETZNER_ROBOT_USER` and
    /// `HETZNER_ROBOT_PASSWORD` replace the defaults;
    /// `HETZNER_HCLOUD_TOKENS_<ENV>`, `HETZNER_ROBOT_USERS_<ENV>` and
    /// `HETZNER_ROBOT_PASSWORDS_<ENV>` set the override for environment
    /// `<env>` (lower-cased).
    pub fn apply_env_overrides(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            let Some(rest) = key.strip_prefix("HETZNER_") else {
                continue;
            };

            match rest {
                "HCLOUD_TOKEN" => self.hcloud.default = Some(value),
                "ROBOT_USER" => self.robot_user.default = Some(value),
                "ROBOT_PASSWORD" => self.robot_password.default = Some(value),
                _ => {
                    let (set, env) = if let Some(env) = rest.strip_prefix("HCLOUD_TOKENS_") {
                        (&mut self.hcloud, env)
                    } else if let Some(env) = rest.strip_prefix("ROBOT_USERS_") {
                        (&mut self.robot_user, env)
                    } else if let Some(env) = rest.strip_prefix("ROBOT_PASSWORDS_") {
                        (&mut self.robot_password, env)
                    } else {
                        continue;
                    };

                    if env.is_empty() {
                        continue;
                    }
                    tracing::debug!("Credential override from environment: {}", key);
                    set.per_environment.insert(env.to_lowercase(), Some(value));
                }
            }
        }
    }
}

/// Inventory and provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HetznerInventoryConfig {
    /// Enable `--names` for `sync` without passing the flag
    pub update_server_names_in_cloud: bool,

    /// Root of the generated inventories (`<dir>/<env>/cloud.yaml`)
    pub inventory_dir: PathBuf,

    /// Environment shown for servers no rule matches
    pub unassigned_environment: String,

    /// Ordered first-match environment rules
    pub environments: Vec<EnvironmentRule>,

    pub hcloud_api_url: String,
    pub robot_api_url: String,
}

impl Default for HetznerInventoryConfig {
    fn default() -> Self {
        Self {
            update_server_names_in_cloud: false,
            inventory_dir: PathBuf::from("inventory"),
            unassigned_environment: DEFAULT_UNASSIGNED_ENVIRONMENT.to_string(),
            environments: Vec::new(),
            hcloud_api_url: DEFAULT_HCLOUD_API_URL.to_string(),
            robot_api_url: DEFAULT_ROBOT_API_URL.to_string(),
        }
    }
}

impl HetznerInventoryConfig {
    /// Compile the configured environment rules
    pub fn ruleset(&self) -> Result<EnvironmentRuleset> {
        Ok(EnvironmentRuleset::new(self.environments.clone())?
            .with_fallback(self.unassigned_environment.clone()))
    }
}
