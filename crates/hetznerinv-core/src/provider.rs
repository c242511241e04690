//! Provider capability traits
//!
//! The bare-metal (Robot) and cloud providers are reached through these traits
//! so the reconciler never depends on a concrete HTTP client.

use crate::error::Result;
use crate::server::{ServerDescriptor, ServerId, ServerUpdate};
use async_trait::async_trait;
use std::collections::HashMap;

/// Bare-metal server listing
#[async_trait]
pub trait BareMetalProvider: Send + Sync {
    /// Returns the provider name (e.g., "hetzner-robot")
    fn name(&self) -> &str;

    /// List all physical servers. Descriptors carry no labels.
    async fn list_servers(&self) -> Result<Vec<ServerDescriptor>>;
}

/// Cloud server listing and updates
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Returns the provider name (e.g., "hetzner-cloud")
    fn name(&self) -> &str;

    /// List all cloud servers with labels and public IPv4
    async fn list_servers(&self) -> Result<Vec<ServerDescriptor>>;

    /// Apply every field set in `update` with a single API call
    async fn update_server(&self, id: &ServerId, update: &ServerUpdate) -> Result<()>;
}

/// Index a listing by server id.
///
/// Built once before a sync run and only read afterwards.
pub fn live_index(servers: Vec<ServerDescriptor>) -> HashMap<ServerId, ServerDescriptor> {
    servers.into_iter().map(|s| (s.id.clone(), s)).collect()
}
