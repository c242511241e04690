//! Hetzner Robot webservice client
//!
//! Only the read-only server listing is needed. The webservice uses HTTP basic
//! authentication with a dedicated webservice user.

use crate::error::{Result, RobotError};
use serde::Deserialize;

const ROBOT_API_BASE: &str = "https://robot-ws.your-server.de";

/// Hetzner Robot webservice client
pub struct RobotClient {
    client: reqwest::Client,
    user: String,
    password: String,
    base_url: String,
}

impl RobotClient {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            user: user.into(),
            password: password.into(),
            base_url: ROBOT_API_BASE.to_string(),
        }
    }

    /// Point the client at another endpoint (e.g. a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// List all dedicated servers of the account
    pub async fn list_servers(&self) -> Result<Vec<RobotServer>> {
        let url = format!("{}/server", self.base_url);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let entries: Vec<ServerEntry> = serde_json::from_str(&text)?;
            return Ok(entries.into_iter().map(|e| e.server).collect());
        }

        let error = serde_json::from_str::<ErrorResponse>(&text).ok().map(|b| b.error);

        // The webservice answers 404 when the account has no servers at all
        if status.as_u16() == 404
            && error
                .as_ref()
                .is_some_and(|e| e.code == "SERVER_NOT_FOUND")
        {
            return Ok(Vec::new());
        }

        if status.as_u16() == 401 {
            let message = error.map(|e| e.message).unwrap_or(text);
            return Err(RobotError::AuthenticationFailed(message));
        }

        let (code, message) = match error {
            Some(e) => (e.code, e.message),
            None => (
                status.canonical_reason().unwrap_or("unknown").to_string(),
                text,
            ),
        };
        Err(RobotError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

// ============ API Types ============

/// Dedicated server as returned by `GET /server`
#[derive(Debug, Clone, Deserialize)]
pub struct RobotServer {
    pub server_number: u64,
    #[serde(default)]
    pub server_name: String,
    pub server_ip: Option<String>,
    #[serde(default)]
    pub product: String,
}

#[derive(Debug, Deserialize)]
struct ServerEntry {
    server: RobotServer,
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
