//! Per-subnet DHCP settings

use super::DhcpManager;
use crate::error::ManagerError;
use crate::translate::{remove_option, set_option};
use crate::validate::{
    join_addresses, parse_dns_servers, parse_pool, parse_routers, parse_subnet,
    validate_hostname, ValidationError,
};
use kea_client::{
    Pool, Subnet4, OPTION_DOMAIN_NAME, OPTION_DOMAIN_NAME_SERVERS, OPTION_ROUTERS,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Subnet as listed for the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubnetSummary {
    pub id: u32,
    pub subnet: String,
    pub pools: Vec<String>,
    pub shared_network: Option<String>,
    pub reservation_count: usize,
}

/// Changes to apply to a subnet; absent fields are left alone.
///
/// For the option fields an empty string removes the option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubnetSettings {
    #[serde(default, alias = "valid_lifetime")]
    pub valid_lifetime: Option<u32>,
    #[serde(default, alias = "renew_timer")]
    pub renew_timer: Option<u32>,
    #[serde(default, alias = "rebind_timer")]
    pub rebind_timer: Option<u32>,
    #[serde(default, alias = "dns_servers")]
    pub dns_servers: Option<String>,
    #[serde(default)]
    pub routers: Option<String>,
    #[serde(default, alias = "domain_name")]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub pools: Option<Vec<String>>,
}

impl SubnetSettings {
    fn touches_timers(&self) -> bool {
        self.valid_lifetime.is_some() || self.renew_timer.is_some() || self.rebind_timer.is_some()
    }
}

impl DhcpManager {
    pub async fn list_subnets(&self) -> Result<Vec<SubnetSummary>, ManagerError> {
        let config = self.client.config_get().await?;
        let subnets = config
            .subnets()?
            .into_iter()
            .map(|(subnet, shared_network)| SubnetSummary {
                id: subnet.id,
                pools: subnet.pools.iter().map(|p| p.pool.clone()).collect(),
                reservation_count: subnet.reservations.len(),
                subnet: subnet.subnet,
                shared_network,
            })
            .collect();
        Ok(subnets)
    }

    /// Full KEA subnet object
    pub async fn get_subnet(&self, id: u32) -> Result<Subnet4, ManagerError> {
        self.client
            .config_get()
            .await?
            .subnet(id)?
            .ok_or(ManagerError::SubnetNotFound(id))
    }

    /// Apply `settings` to subnet `id` through `config-set`
    pub async fn update_subnet(
        &self,
        id: u32,
        settings: &SubnetSettings,
    ) -> Result<Subnet4, ManagerError> {
        let mut config = self.client.config_get().await?;
        let mut subnet = config.subnet(id)?.ok_or(ManagerError::SubnetNotFound(id))?;

        apply_settings(&mut subnet, settings)?;
        if !config.replace_subnet(&subnet)? {
            return Err(ManagerError::SubnetNotFound(id));
        }
        self.push_config(&config).await?;

        info!("Updated subnet {} ({})", subnet.id, subnet.subnet);
        Ok(subnet)
    }
}

/// Validate `settings` and apply them to `subnet`
pub(crate) fn apply_settings(
    subnet: &mut Subnet4,
    settings: &SubnetSettings,
) -> Result<(), ManagerError> {
    if settings.touches_timers() {
        let valid = settings.valid_lifetime.or(subnet.valid_lifetime);
        let renew = settings.renew_timer.or(subnet.renew_timer);
        let rebind = settings.rebind_timer.or(subnet.rebind_timer);
        check_timers(renew, rebind, valid)?;
        subnet.valid_lifetime = valid;
        subnet.renew_timer = renew;
        subnet.rebind_timer = rebind;
    }

    if let Some(dns) = settings.dns_servers.as_deref() {
        let servers = parse_dns_servers(dns)?;
        if servers.is_empty() {
            remove_option(&mut subnet.option_data, OPTION_DOMAIN_NAME_SERVERS);
        } else {
            set_option(
                &mut subnet.option_data,
                OPTION_DOMAIN_NAME_SERVERS,
                join_addresses(&servers),
            );
        }
    }

    if let Some(routers) = settings.routers.as_deref() {
        let routers = parse_routers(routers)?;
        if routers.is_empty() {
            remove_option(&mut subnet.option_data, OPTION_ROUTERS);
        } else {
            set_option(&mut subnet.option_data, OPTION_ROUTERS, join_addresses(&routers));
        }
    }

    if let Some(domain) = settings.domain_name.as_deref() {
        match validate_hostname(domain)? {
            Some(domain) => set_option(&mut subnet.option_data, OPTION_DOMAIN_NAME, domain),
            None => {
                remove_option(&mut subnet.option_data, OPTION_DOMAIN_NAME);
            }
        }
    }

    if let Some(pools) = settings.pools.as_deref() {
        subnet.pools = rebuild_pools(subnet, pools)?;
    }

    Ok(())
}

/// renew <= rebind <= valid for every pair that is set
fn check_timers(
    renew: Option<u32>,
    rebind: Option<u32>,
    valid: Option<u32>,
) -> Result<(), ValidationError> {
    let ordered = [("renew-timer", renew), ("rebind-timer", rebind), ("valid-lifetime", valid)];
    for (i, (lower_name, lower)) in ordered.iter().enumerate() {
        for (upper_name, upper) in &ordered[i + 1..] {
            if let (Some(lower), Some(upper)) = (lower, upper) {
                if lower > upper {
                    return Err(ValidationError::InvalidTimers(format!(
                        "{} ({}) must not exceed {} ({})",
                        lower_name, lower, upper_name, upper
                    )));
                }
            }
        }
    }
    Ok(())
}

/// New pool list; pools that already exist keep their extra settings
fn rebuild_pools(subnet: &Subnet4, pools: &[String]) -> Result<Vec<Pool>, ManagerError> {
    let net = parse_subnet(&subnet.subnet).map_err(|_| {
        ManagerError::InvalidConfig(format!(
            "subnet {} has invalid prefix '{}'",
            subnet.id, subnet.subnet
        ))
    })?;

    pools
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|raw| {
            let (pool, range) = parse_pool(raw)?;
            if !range.within(&net) {
                return Err(ManagerError::OutOfSubnet {
                    ip: pool,
                    subnet: subnet.subnet.clone(),
                });
            }
            Ok(subnet
                .pools
                .iter()
                .find(|existing| {
                    parse_pool(&existing.pool).is_ok_and(|(normalized, _)| normalized == pool)
                })
                .cloned()
                .unwrap_or_else(|| Pool::new(pool)))
        })
        .collect()
}
