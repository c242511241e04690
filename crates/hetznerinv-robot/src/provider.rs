//! Hetzner Robot provider implementation

use crate::api::{RobotClient, RobotServer};
use async_trait::async_trait;
use hetznerinv_core::{BareMetalProvider, InventoryError, ServerDescriptor, ServerId};

/// Hetzner Robot provider for one webservice account
pub struct RobotProvider {
    client: RobotClient,
}

impl RobotProvider {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            client: RobotClient::new(user, password),
        }
    }

    pub fn from_client(client: RobotClient) -> Self {
        Self { client }
    }
}

impl From<RobotServer> for ServerDescriptor {
    fn from(server: RobotServer) -> Self {
        ServerDescriptor {
            id: ServerId::Number(server.server_number),
            name: server.server_name,
            public_ipv4: server.server_ip,
            product: server.product,
            labels: Default::default(),
        }
    }
}

#[async_trait]
impl BareMetalProvider for RobotProvider {
    fn name(&self) -> &str {
        "hetzner-robot"
    }

    async fn list_servers(&self) -> hetznerinv_core::Result<Vec<ServerDescriptor>> {
        let servers = self
            .client
            .list_servers()
            .await
            .map_err(|e| InventoryError::Api(e.to_string()))?;

        tracing::debug!(
            "Hetzner Robot returned {} servers for {}",
            servers.len(),
            self.client.user()
        );
        Ok(servers.into_iter().map(ServerDescriptor::from).collect())
    }
}
