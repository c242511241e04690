//! hetznerinv core
//!
//! Provider-independent logic behind the `hetznerinv` CLI: which environment a
//! server belongs to, which credential applies to an environment, and how a
//! declared inventory is pushed to Hetzner Cloud.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  hetznerinv CLI                   │
//! │           (hetznerinv list / sync)                │
//! └─────────────────┬────────────────────────────────┘
//!                   │
//! ┌─────────────────▼────────────────────────────────┐
//! │                hetznerinv-core                    │
//! │  ┌────────────┐ ┌─────────────┐ ┌─────────────┐  │
//! │  │ credentials│ │ environment │ │  inventory  │  │
//! │  └────────────┘ └─────────────┘ └──────┬──────┘  │
//! │  ┌─────────────────────────────────────▼──────┐  │
//! │  │   reconcile  ──▶  trait ReportSink          │  │
//! │  └─────────────────────┬──────────────────────┘  │
//! │  trait BareMetalProvider / trait CloudProvider   │
//! └───────┬─────────────────┬────────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │ hetzner robot │ │ hetzner cloud │
//! └───────────────┘ └───────────────┘
//! ```

pub mod credentials;
pub mod environment;
pub mod error;
pub mod inventory;
pub mod provider;
pub mod reconcile;
pub mod server;

// Re-exports
pub use credentials::CredentialSet;
pub use environment::{
    DEFAULT_UNASSIGNED_ENVIRONMENT, EnvironmentAssignment, EnvironmentRule, EnvironmentRuleset,
    LabelMatch,
};
pub use error::{InventoryError, Result};
pub use inventory::{DesiredHostState, cloud_inventory_path, load_desired_state};
pub use provider::{BareMetalProvider, CloudProvider, live_index};
pub use reconcile::{
    HostDelta, ReconciliationOutcome, ReportSink, SyncOptions, SyncStatus, SyncSummary, diff_host,
    reconcile,
};
pub use server::{Labels, ServerDescriptor, ServerId, ServerUpdate};
