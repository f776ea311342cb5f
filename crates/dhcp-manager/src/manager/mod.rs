//! DHCP management on top of the KEA Control Agent.
//!
//! `DhcpManager` is split by concern:
//! - `leases`: lease listing with the lease_cmds fallback chain
//! - `reservations`: reservation listing, creation and deletion with the
//!   config-set fallback
//! - `subnets`: per-subnet settings
//! - `transfer`: bulk import and export

pub mod leases;
pub mod reservations;
pub mod subnets;
pub mod transfer;
#[cfg(test)]
mod transfer_test;

use crate::error::ManagerError;
use kea_client::{Dhcp4Config, KeaClientTrait};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Commands that identify the optional hook libraries
const HOST_CMDS_MARKER: &str = "reservation-add";
const LEASE_CMDS_MARKER: &str = "lease4-get-all";

/// Behaviour switches for the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Subnet used when a request does not name one
    pub default_subnet_id: u32,
    /// Issue `config-write` after every successful `config-set`
    pub persist_config: bool,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            default_subnet_id: 1,
            persist_config: false,
        }
    }
}

/// Commands accepted by the DHCPv4 daemon and the hook libraries they imply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub commands: Vec<String>,
    pub host_cmds: bool,
    pub lease_cmds: bool,
}

/// Lease, reservation and subnet operations against one Control Agent
#[derive(Clone)]
pub struct DhcpManager {
    pub(crate) client: Arc<dyn KeaClientTrait>,
    pub(crate) options: ManagerOptions,
}

impl std::fmt::Debug for DhcpManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DhcpManager")
            .field("url", &self.client.url())
            .field("options", &self.options)
            .finish()
    }
}

impl DhcpManager {
    pub fn new(client: Arc<dyn KeaClientTrait>, options: ManagerOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> ManagerOptions {
        self.options
    }

    /// Control Agent URL
    pub fn url(&self) -> &str {
        self.client.url()
    }

    /// Version string of the DHCPv4 daemon
    pub async fn kea_version(&self) -> Result<String, ManagerError> {
        Ok(self.client.version_get().await?)
    }

    /// Query `list-commands` and report which hook libraries are loaded
    pub async fn capabilities(&self) -> Result<Capabilities, ManagerError> {
        let mut commands = self.client.list_commands().await?;
        commands.sort();
        let host_cmds = commands.iter().any(|c| c == HOST_CMDS_MARKER);
        let lease_cmds = commands.iter().any(|c| c == LEASE_CMDS_MARKER);
        info!(
            "KEA accepts {} commands (host_cmds: {}, lease_cmds: {})",
            commands.len(),
            host_cmds,
            lease_cmds
        );
        Ok(Capabilities {
            commands,
            host_cmds,
            lease_cmds,
        })
    }

    /// Push a modified configuration back, persisting it when configured
    pub(crate) async fn push_config(&self, config: &Dhcp4Config) -> Result<(), ManagerError> {
        self.client.config_set(config).await?;
        if self.options.persist_config {
            debug!("Persisting running configuration with config-write");
            self.client.config_write().await?;
        }
        Ok(())
    }
}
