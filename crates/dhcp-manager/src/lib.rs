//! DHCP management on top of the KEA Control Agent
//!
//! Validates and translates reservation records coming from the browser,
//! and drives KEA through [`kea_client::KeaClientTrait`]. When an optional
//! hook library is missing, operations fall back to editing the running
//! configuration with `config-get` / `config-set`.
//!
//! # Example
//!
//! ```no_run
//! use dhcp_manager::{DhcpManager, ManagerOptions, ReservationForm};
//! use kea_client::{KeaClient, KeaClientConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = KeaClient::new(KeaClientConfig::new("http://kea-ctrl-agent:8000"))?;
//! let manager = DhcpManager::new(Arc::new(client), ManagerOptions::default());
//!
//! let form = ReservationForm {
//!     ip_address: "192.168.1.10".to_string(),
//!     hw_address: "aa:bb:cc:dd:ee:ff".to_string(),
//!     dns_servers: Some("8.8.8.8, 1.1.1.1".to_string()),
//!     ..ReservationForm::default()
//! };
//! let outcome = manager.create_reservation(&form).await?;
//! println!("created via {}", outcome.method);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod manager;
pub mod translate;
#[cfg(test)]
mod translate_test;
pub mod validate;

pub use error::ManagerError;
pub use manager::leases::LEASE_PAGE_LIMIT;
pub use manager::reservations::{CreateOutcome, ReservationEntry, WriteMethod};
pub use manager::subnets::{SubnetSettings, SubnetSummary};
pub use manager::transfer::{ExportDocument, ImportFailure, ImportPayload, ImportSummary};
pub use manager::{Capabilities, DhcpManager, ManagerOptions};
pub use translate::ReservationForm;
pub use validate::ValidationError;
