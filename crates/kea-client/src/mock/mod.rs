//! Mock KeaClient for unit testing
//!
//! This module provides an in-memory Control Agent implementing
//! `KeaClientTrait`, so console logic can be tested without a running KEA.
//!
//! The mock keeps a `Dhcp4Config` and a lease table, can pretend that the
//! `host_cmds` / `lease_cmds` hook libraries are missing, can make
//! `config-set` fail, and records every command it receives so tests can
//! assert the call sequence.
//!
//! - `helpers.rs` - builders for subnets and leases

mod helpers;

pub use helpers::{test_lease, test_reservation, test_subnet};

use crate::config::Dhcp4Config;
use crate::error::KeaError;
use crate::kea_trait::KeaClientTrait;
use crate::models::{HostReservation, Lease4, Subnet4};
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct MockState {
    config: Dhcp4Config,
    leases: Vec<Lease4>,
    commands: Vec<String>,
    version: String,
    host_cmds: bool,
    lease_get_all: bool,
    lease_get_page: bool,
    fail_config_set: bool,
    config_writes: usize,
}

/// Mock KeaClient for testing
#[derive(Debug, Clone)]
pub struct MockKeaClient {
    url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockKeaClient {
    /// Create a new mock client with an empty configuration and all hooks loaded
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: Arc::new(Mutex::new(MockState {
                config: Dhcp4Config::default(),
                leases: Vec::new(),
                commands: Vec::new(),
                version: "2.4.1".to_string(),
                host_cmds: true,
                lease_get_all: true,
                lease_get_page: true,
                fail_config_set: false,
                config_writes: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a subnet to the configuration, replacing one with the same id
    /// (for test setup)
    pub fn add_subnet(&self, subnet: Subnet4) {
        let mut state = self.state();
        let replaced = state
            .config
            .replace_subnet(&subnet)
            .unwrap_or_else(|e| panic!("mock config rejected subnet: {e}"));
        if !replaced {
            state
                .config
                .add_subnet(&subnet)
                .unwrap_or_else(|e| panic!("mock config rejected subnet: {e}"));
        }
    }

    /// Replace the whole configuration (for test setup)
    pub fn set_config(&self, config: Dhcp4Config) {
        self.state().config = config;
    }

    /// Add a lease (for test setup)
    pub fn add_lease(&self, lease: Lease4) {
        self.state().leases.push(lease);
    }

    /// Behave as if `libdhcp_host_cmds.so` were not loaded
    pub fn without_host_cmds(self) -> Self {
        self.state().host_cmds = false;
        self
    }

    /// Behave as if `libdhcp_lease_cmds.so` were not loaded
    pub fn without_lease_cmds(self) -> Self {
        {
            let mut state = self.state();
            state.lease_get_all = false;
            state.lease_get_page = false;
        }
        self
    }

    /// Only `lease4-get-all` is missing; paging still works
    pub fn without_lease_get_all(self) -> Self {
        self.state().lease_get_all = false;
        self
    }

    /// Make every `config-set` fail with result code 1
    pub fn fail_config_set(&self, fail: bool) {
        self.state().fail_config_set = fail;
    }

    /// Commands received so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }

    /// Current configuration
    pub fn config(&self) -> Dhcp4Config {
        self.state().config.clone()
    }

    /// Number of `config-write` calls received
    pub fn config_writes(&self) -> usize {
        self.state().config_writes
    }

    /// Subnet from the current configuration
    pub fn subnet(&self, id: u32) -> Option<Subnet4> {
        self.state().config.subnet(id).ok().flatten()
    }

    fn record(&self, command: &str) {
        self.state().commands.push(command.to_string());
    }
}

fn unsupported(command: &str) -> KeaError {
    KeaError::Unsupported {
        command: command.to_string(),
        text: format!("'{}' command not supported.", command),
    }
}

fn failed(command: &str, text: impl Into<String>) -> KeaError {
    KeaError::CommandFailed {
        command: command.to_string(),
        code: 1,
        text: text.into(),
    }
}

fn ip_key(lease: &Lease4) -> Ipv4Addr {
    lease.ip_address.parse().unwrap_or(Ipv4Addr::UNSPECIFIED)
}

#[async_trait::async_trait]
impl KeaClientTrait for MockKeaClient {
    fn url(&self) -> &str {
        &self.url
    }

    async fn version_get(&self) -> Result<String, KeaError> {
        self.record("version-get");
        Ok(self.state().version.clone())
    }

    async fn list_commands(&self) -> Result<Vec<String>, KeaError> {
        self.record("list-commands");
        let state = self.state();
        let mut commands: Vec<String> = [
            "build-report",
            "config-get",
            "config-set",
            "config-test",
            "config-write",
            "list-commands",
            "version-get",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();
        if state.lease_get_all {
            commands.push("lease4-get-all".to_string());
        }
        if state.lease_get_page {
            commands.push("lease4-get-page".to_string());
        }
        if state.host_cmds {
            commands.extend(
                ["reservation-add", "reservation-del", "reservation-get"]
                    .iter()
                    .map(|c| c.to_string()),
            );
        }
        Ok(commands)
    }

    async fn config_get(&self) -> Result<Dhcp4Config, KeaError> {
        self.record("config-get");
        Ok(self.state().config.clone())
    }

    async fn config_set(&self, config: &Dhcp4Config) -> Result<(), KeaError> {
        self.record("config-set");
        let mut state = self.state();
        if state.fail_config_set {
            return Err(failed("config-set", "configuration rejected"));
        }
        state.config = config.clone();
        Ok(())
    }

    async fn config_write(&self) -> Result<(), KeaError> {
        self.record("config-write");
        self.state().config_writes += 1;
        Ok(())
    }

    async fn lease4_get_all(&self) -> Result<Vec<Lease4>, KeaError> {
        self.record("lease4-get-all");
        let state = self.state();
        if !state.lease_get_all {
            return Err(unsupported("lease4-get-all"));
        }
        Ok(state.leases.clone())
    }

    async fn lease4_get_page(&self, from: &str, limit: u32) -> Result<Vec<Lease4>, KeaError> {
        self.record("lease4-get-page");
        let state = self.state();
        if !state.lease_get_page {
            return Err(unsupported("lease4-get-page"));
        }

        let mut leases = state.leases.clone();
        leases.sort_by_key(ip_key);

        let after = if from == "start" {
            None
        } else {
            Some(
                from.parse::<Ipv4Addr>()
                    .map_err(|_| failed("lease4-get-page", format!("invalid 'from' address {}", from)))?,
            )
        };

        Ok(leases
            .into_iter()
            .filter(|lease| after.is_none_or(|after| ip_key(lease) > after))
            .take(limit as usize)
            .collect())
    }

    async fn reservation_add(&self, reservation: &HostReservation) -> Result<(), KeaError> {
        self.record("reservation-add");
        let mut state = self.state();
        if !state.host_cmds {
            return Err(unsupported("reservation-add"));
        }

        let subnet_id = reservation
            .subnet_id
            .ok_or_else(|| failed("reservation-add", "missing subnet-id"))?;
        let mut subnet = state
            .config
            .subnet(subnet_id)?
            .ok_or_else(|| failed("reservation-add", format!("subnet {} not found", subnet_id)))?;

        if let Some(ip) = reservation.ip_address.as_deref() {
            if subnet.reservation_by_ip(ip).is_some() {
                return Err(failed("reservation-add", "Host already exists."));
            }
        }

        let mut stored = reservation.clone();
        stored.subnet_id = None;
        subnet.reservations.push(stored);
        state.config.replace_subnet(&subnet)?;
        Ok(())
    }

    async fn reservation_del(&self, subnet_id: u32, ip_address: &str) -> Result<bool, KeaError> {
        self.record("reservation-del");
        let mut state = self.state();
        if !state.host_cmds {
            return Err(unsupported("reservation-del"));
        }

        let Some(mut subnet) = state.config.subnet(subnet_id)? else {
            return Ok(false);
        };
        let before = subnet.reservations.len();
        subnet
            .reservations
            .retain(|r| r.ip_address.as_deref() != Some(ip_address));
        if subnet.reservations.len() == before {
            return Ok(false);
        }
        state.config.replace_subnet(&subnet)?;
        Ok(true)
    }
}
