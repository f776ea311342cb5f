//! KeaClient trait for mocking
//!
//! This trait abstracts the KeaClient so the console logic can be tested
//! against an in-memory Control Agent. The concrete KeaClient implements
//! this trait, and tests use `MockKeaClient`.

use crate::config::Dhcp4Config;
use crate::error::KeaError;
use crate::models::{HostReservation, Lease4};

/// Trait for KEA Control Agent operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait KeaClientTrait: Send + Sync {
    /// Get the Control Agent URL
    fn url(&self) -> &str;

    /// `version-get`: extended version string of the DHCPv4 daemon
    async fn version_get(&self) -> Result<String, KeaError>;

    /// `list-commands`: commands the DHCPv4 daemon currently accepts
    async fn list_commands(&self) -> Result<Vec<String>, KeaError>;

    // Configuration
    async fn config_get(&self) -> Result<Dhcp4Config, KeaError>;
    async fn config_set(&self, config: &Dhcp4Config) -> Result<(), KeaError>;
    async fn config_write(&self) -> Result<(), KeaError>;

    // lease_cmds hook library
    async fn lease4_get_all(&self) -> Result<Vec<Lease4>, KeaError>;
    async fn lease4_get_page(&self, from: &str, limit: u32) -> Result<Vec<Lease4>, KeaError>;

    // host_cmds hook library
    async fn reservation_add(&self, reservation: &HostReservation) -> Result<(), KeaError>;
    /// Returns `false` when KEA reports that nothing was deleted
    async fn reservation_del(&self, subnet_id: u32, ip_address: &str) -> Result<bool, KeaError>;
}
