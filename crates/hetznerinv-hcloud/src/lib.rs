//! Hetzner Cloud provider for hetznerinv
//!
//! Implements [`hetznerinv_core::CloudProvider`] on top of the Hetzner Cloud
//! REST API (`https://api.hetzner.cloud/v1`).
//!
//! # Example
//!
//! ```ignore
//! use hetznerinv_core::CloudProvider;
//! use hetznerinv_hcloud::HcloudProvider;
//!
//! let provider = HcloudProvider::new(token);
//! for server in provider.list_servers().await? {
//!     println!("{} {}", server.id, server.name);
//! }
//! ```

pub mod api;
pub mod error;
pub mod provider;

pub use api::{ApiServer, HcloudClient};
pub use error::{HcloudError, Result};
pub use provider::HcloudProvider;
