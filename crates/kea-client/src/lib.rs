//! KEA Control Agent Client
//!
//! A Rust client library for the KEA DHCP Control Agent REST API.
//! Builds the JSON command envelope KEA expects, relays it over HTTP and
//! normalizes KEA's result codes into typed outcomes.
//!
//! # Example
//!
//! ```no_run
//! use kea_client::{KeaClient, KeaClientConfig, KeaClientTrait};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = KeaClient::new(KeaClientConfig::new("http://kea-ctrl-agent:8000"))?;
//!
//! // Query the running configuration
//! let config = client.config_get().await?;
//! for (subnet, _shared_network) in config.subnets()? {
//!     println!("subnet {} -> {}", subnet.id, subnet.subnet);
//! }
//!
//! // Leases require the lease_cmds hook library
//! let leases = client.lease4_get_all().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Hook libraries
//!
//! Some commands are only available when KEA loads an optional hook library
//! (`libdhcp_host_cmds.so`, `libdhcp_lease_cmds.so`). When one is missing,
//! KEA answers with result code 2 and the client returns
//! [`KeaError::Unsupported`] so callers can pick a fallback.

pub mod client;
pub mod command;
pub mod common;
pub mod config;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod kea_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::{KeaClient, KeaClientConfig};
pub use command::{CommandResponse, KeaCommand, ResultCode, Service};
pub use common::{Credentials, HttpClient};
pub use config::Dhcp4Config;
pub use error::KeaError;
pub use kea_trait::KeaClientTrait;
pub use models::*;
#[cfg(feature = "test-util")]
pub use mock::MockKeaClient;
