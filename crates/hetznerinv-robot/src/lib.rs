//! Hetzner Robot provider for hetznerinv
//!
//! Lists dedicated servers through the Robot webservice
//! (`https://robot-ws.your-server.de`) and exposes them as
//! [`hetznerinv_core::BareMetalProvider`].

pub mod api;
pub mod error;
pub mod provider;

pub use api::{RobotClient, RobotServer};
pub use error::{Result, RobotError};
pub use provider::RobotProvider;
