//! Lease listing
//!
//! `lease4-get-all` is tried first. Some lease backends or KEA builds only
//! offer `lease4-get-page`, so paging is the second attempt. When neither is
//! available the error names the lease database and the hook library to load.

use super::DhcpManager;
use crate::error::ManagerError;
use kea_client::{KeaError, Lease4};
use tracing::{debug, error, info, warn};

/// Leases requested per `lease4-get-page` call
pub const LEASE_PAGE_LIMIT: u32 = 1000;

/// Cursor for the first page
const FIRST_PAGE: &str = "start";

impl DhcpManager {
    /// Active leases, optionally only those of one subnet
    pub async fn list_leases(&self, subnet_id: Option<u32>) -> Result<Vec<Lease4>, ManagerError> {
        let leases = match self.client.lease4_get_all().await {
            Ok(leases) => leases,
            Err(e) if e.is_unsupported() => {
                warn!("lease4-get-all not supported, trying lease4-get-page: {}", e);
                match self.leases_paged().await {
                    Ok(leases) => leases,
                    Err(e) if e.is_unsupported() => {
                        return Err(self.lease_hook_unavailable().await);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Err(e) => return Err(e.into()),
        };

        let leases: Vec<Lease4> = match subnet_id {
            Some(id) => leases.into_iter().filter(|l| l.subnet_id == id).collect(),
            None => leases,
        };
        info!("Found {} leases", leases.len());
        Ok(leases)
    }

    /// Walk `lease4-get-page` until a short page.
    ///
    /// Only "unsupported" on the first page is returned as an error; other
    /// failures stop paging and keep what was collected.
    async fn leases_paged(&self) -> Result<Vec<Lease4>, KeaError> {
        let mut all = Vec::new();
        let mut from = FIRST_PAGE.to_string();

        loop {
            debug!("Fetching lease page from {}", from);
            let page = match self.client.lease4_get_page(&from, LEASE_PAGE_LIMIT).await {
                Ok(page) => page,
                Err(e) if e.is_unsupported() => return Err(e),
                Err(e) => {
                    warn!("Stopped paging leases at {}: {}", from, e);
                    break;
                }
            };

            let full_page = page.len() >= LEASE_PAGE_LIMIT as usize;
            let next = page.last().map(|l| l.ip_address.clone());
            all.extend(page);

            match next {
                Some(next) if full_page && next != from => from = next,
                _ => break,
            }
        }

        info!("Fetched {} leases with lease4-get-page", all.len());
        Ok(all)
    }

    async fn lease_hook_unavailable(&self) -> ManagerError {
        let backend = match self.client.config_get().await {
            Ok(config) => config.lease_database_type(),
            Err(e) => {
                debug!("Could not read lease database type: {}", e);
                "unknown".to_string()
            }
        };
        let message = format!(
            "Unable to retrieve leases: lease4-get-all and lease4-get-page are not supported \
             (lease database: {}). Load the lease_cmds hook library by adding \
             {{\"library\": \"/usr/lib/kea/hooks/libdhcp_lease_cmds.so\"}} to \
             \"hooks-libraries\" in the Dhcp4 configuration.",
            backend
        );
        error!("{}", message);
        ManagerError::HookUnavailable(message)
    }
}
