//! Hetzner Cloud provider implementation

use crate::api::{ApiServer, HcloudClient};
use crate::error::HcloudError;
use async_trait::async_trait;
use hetznerinv_core::{CloudProvider, InventoryError, ServerDescriptor, ServerId, ServerUpdate};

/// Hetzner Cloud provider for one project token
pub struct HcloudProvider {
    client: HcloudClient,
}

impl HcloudProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: HcloudClient::new(token),
        }
    }

    pub fn from_client(client: HcloudClient) -> Self {
        Self { client }
    }
}

impl From<ApiServer> for ServerDescriptor {
    fn from(server: ApiServer) -> Self {
        let public_ipv4 = server.public_ipv4();
        let product = server.server_type_name().to_string();
        ServerDescriptor {
            id: ServerId::Number(server.id),
            name: server.name,
            public_ipv4,
            product,
            labels: server.labels,
        }
    }
}

/// Inventory ids are normalized on load, so text here is never numeric
fn numeric_id(id: &ServerId) -> crate::error::Result<u64> {
    match id {
        ServerId::Number(n) => Ok(*n),
        ServerId::Text(s) => Err(HcloudError::InvalidServerId(s.clone())),
    }
}

fn to_inventory_error(e: HcloudError) -> InventoryError {
    InventoryError::Api(e.to_string())
}

#[async_trait]
impl CloudProvider for HcloudProvider {
    fn name(&self) -> &str {
        "hetzner-cloud"
    }

    async fn list_servers(&self) -> hetznerinv_core::Result<Vec<ServerDescriptor>> {
        let servers = self
            .client
            .list_servers()
            .await
            .map_err(to_inventory_error)?;

        tracing::debug!("Hetzner Cloud returned {} servers", servers.len());
        Ok(servers.into_iter().map(ServerDescriptor::from).collect())
    }

    async fn update_server(
        &self,
        id: &ServerId,
        update: &ServerUpdate,
    ) -> hetznerinv_core::Result<()> {
        let id = numeric_id(id).map_err(to_inventory_error)?;
        self.client
            .update_server(id, update)
            .await
            .map_err(to_inventory_error)?;
        Ok(())
    }
}
