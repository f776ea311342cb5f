//! Manager errors

use crate::validate::ValidationError;
use kea_client::KeaError;
use thiserror::Error;

/// Errors that can occur while managing leases, reservations and subnets
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// KEA command or transport error
    #[error(transparent)]
    Kea(#[from] KeaError),

    /// Subnet id not present in the running configuration
    #[error("Subnet {0} not found in KEA configuration")]
    SubnetNotFound(u32),

    /// Address does not belong to the target subnet
    #[error("IP address {ip} is outside subnet {subnet}")]
    OutOfSubnet { ip: String, subnet: String },

    /// Change conflicts with an existing reservation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Reservation not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Neither the hook command nor any fallback is available
    #[error("{0}")]
    HookUnavailable(String),

    /// Running configuration has an unexpected shape
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ManagerError {
    /// True for errors caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ManagerError::Validation(_) | ManagerError::OutOfSubnet { .. }
        )
    }
}
