//! Hetzner Cloud API client
//!
//! Direct implementation of the two endpoints the inventory needs: paginated
//! server listing and server updates. Authentication uses a project API token
//! as Bearer token.

use crate::error::{HcloudError, Result};
use hetznerinv_core::{Labels, ServerUpdate};
use serde::Deserialize;

const HCLOUD_API_BASE: &str = "https://api.hetzner.cloud/v1";
const PER_PAGE: u32 = 50;

/// Hetzner Cloud API client
pub struct HcloudClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl HcloudClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: HCLOUD_API_BASE.to_string(),
        }
    }

    /// Point the client at another API endpoint (e.g. a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// List all servers of the project, following pagination
    pub async fn list_servers(&self) -> Result<Vec<ApiServer>> {
        let mut servers = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/servers?page={}&per_page={}",
                self.base_url, page, PER_PAGE
            );
            tracing::debug!("GET {}", url);

            let response = self.client.get(&url).bearer_auth(&self.token).send().await?;
            let body: ListServersResponse = read_json(response).await?;

            servers.extend(body.servers);

            match body.meta.and_then(|m| m.pagination.next_page) {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(servers)
    }

    /// Update name and/or labels of a server in one call
    pub async fn update_server(&self, id: u64, update: &ServerUpdate) -> Result<ApiServer> {
        let url = format!("{}/servers/{}", self.base_url, id);
        tracing::debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(update)
            .send()
            .await?;

        let body: ServerResponse = read_json(response).await?;
        Ok(body.server)
    }
}

/// Decode a successful body, or turn an error body into `HcloudError::Api`
async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let (code, message) = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => (body.error.code, body.error.message),
            Err(_) => (
                status.canonical_reason().unwrap_or("unknown").to_string(),
                text,
            ),
        };
        return Err(HcloudError::Api {
            status: status.as_u16(),
            code,
            message,
        });
    }

    Ok(serde_json::from_str(&text)?)
}

// ============ API Types ============

/// Server as returned by the API (fields the inventory uses)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiServer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub labels: Labels,
    pub public_net: Option<PublicNet>,
    pub server_type: Option<ServerType>,
}

impl ApiServer {
    pub fn public_ipv4(&self) -> Option<String> {
        self.public_net
            .as_ref()?
            .ipv4
            .as_ref()
            .map(|v4| v4.ip.clone())
    }

    pub fn server_type_name(&self) -> &str {
        self.server_type
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicNet {
    pub ipv4: Option<Ipv4>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ipv4 {
    pub ip: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerType {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ListServersResponse {
    servers: Vec<ApiServer>,
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    next_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ServerResponse {
    server: ApiServer,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: String,
}
