//! Reservation listing, creation and deletion
//!
//! Creation and deletion go through host_cmds first. When KEA reports the
//! command as unsupported, the change is applied to the running
//! configuration instead (`config-get`, local edit, `config-set`). That
//! sequence is not transactional: if `config-set` fails, KEA keeps its old
//! configuration and the operation is reported as failed.

use super::DhcpManager;
use crate::error::ManagerError;
use crate::translate::{dns_servers_from_options, from_kea, to_kea, ReservationForm};
use crate::validate::{parse_ipv4, parse_subnet, ValidationError};
use kea_client::{Dhcp4Config, HostReservation, KeaError, Subnet4};
use serde::Serialize;
use std::fmt;
use tracing::{error, info, warn};

/// Reservation as listed for the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReservationEntry {
    pub ip_address: Option<String>,
    pub hw_address: Option<String>,
    pub hostname: String,
    pub subnet_id: u32,
    pub subnet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<String>,
}

/// How a reservation change reached KEA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMethod {
    /// `reservation-add` / `reservation-del` from the host_cmds hook
    HostCmds,
    /// Fetch-modify-push of the running configuration
    ConfigSet,
}

impl WriteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMethod::HostCmds => "host-cmds",
            WriteMethod::ConfigSet => "config-set",
        }
    }
}

impl fmt::Display for WriteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOutcome {
    pub reservation: ReservationForm,
    pub method: WriteMethod,
}

impl DhcpManager {
    /// Reservations from the running configuration, optionally for one subnet
    pub async fn list_reservations(
        &self,
        subnet_id: Option<u32>,
    ) -> Result<Vec<ReservationEntry>, ManagerError> {
        let config = self.client.config_get().await?;

        let mut entries = Vec::new();
        for (subnet, _) in config.subnets()? {
            if subnet_id.is_some_and(|id| id != subnet.id) {
                continue;
            }
            for reservation in &subnet.reservations {
                entries.push(ReservationEntry {
                    ip_address: reservation.ip_address.clone(),
                    hw_address: reservation.hw_address.clone(),
                    hostname: reservation.hostname.clone().unwrap_or_default(),
                    subnet_id: subnet.id,
                    subnet: subnet.subnet.clone(),
                    dns_servers: dns_servers_from_options(&reservation.option_data),
                });
            }
        }

        info!("Found {} reservations", entries.len());
        Ok(entries)
    }

    /// Validate and create a reservation, falling back to `config-set`
    /// when host_cmds is not loaded
    pub async fn create_reservation(
        &self,
        form: &ReservationForm,
    ) -> Result<CreateOutcome, ManagerError> {
        let reservation = to_kea(form, self.options.default_subnet_id)?;
        let outcome_form = reservation_form(&reservation, self.options.default_subnet_id);

        match self.client.reservation_add(&reservation).await {
            Ok(()) => {
                info!(
                    "Created reservation: IP={}, MAC={} (host_cmds)",
                    outcome_form.ip_address, outcome_form.hw_address
                );
                Ok(CreateOutcome {
                    reservation: outcome_form,
                    method: WriteMethod::HostCmds,
                })
            }
            Err(e) if e.is_unsupported() => {
                warn!("reservation-add not supported, using config-set fallback: {}", e);
                let mut config = self.client.config_get().await?;
                insert_reservation(&mut config, reservation)?;
                self.push_config(&config).await.inspect_err(|e| {
                    error!(
                        "config-set fallback failed for {}; KEA configuration unchanged: {}",
                        outcome_form.ip_address, e
                    );
                })?;
                info!(
                    "Created reservation via config-set: IP={}, MAC={}",
                    outcome_form.ip_address, outcome_form.hw_address
                );
                Ok(CreateOutcome {
                    reservation: outcome_form,
                    method: WriteMethod::ConfigSet,
                })
            }
            Err(e) => Err(conflict_or(e)),
        }
    }

    /// Delete the reservation for `ip_address`, falling back to `config-set`
    /// when host_cmds is not loaded
    pub async fn delete_reservation(
        &self,
        ip_address: &str,
        subnet_id: Option<u32>,
    ) -> Result<WriteMethod, ManagerError> {
        let ip = parse_ipv4(ip_address)?.to_string();
        let subnet_id = subnet_id.unwrap_or(self.options.default_subnet_id);
        let not_found =
            || ManagerError::NotFound(format!("reservation for {} in subnet {}", ip, subnet_id));

        match self.client.reservation_del(subnet_id, &ip).await {
            Ok(true) => {
                info!("Deleted reservation: IP={} (host_cmds)", ip);
                Ok(WriteMethod::HostCmds)
            }
            Ok(false) => Err(not_found()),
            Err(e) if e.is_unsupported() => {
                warn!("reservation-del not supported, using config-set fallback: {}", e);
                let mut config = self.client.config_get().await?;
                if !remove_reservation(&mut config, subnet_id, &ip)? {
                    return Err(not_found());
                }
                self.push_config(&config).await?;
                info!("Deleted reservation via config-set: IP={}", ip);
                Ok(WriteMethod::ConfigSet)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Browser form echoing what was sent to KEA
fn reservation_form(reservation: &HostReservation, default_subnet: u32) -> ReservationForm {
    from_kea(reservation, default_subnet).unwrap_or_default()
}

/// host_cmds reports a duplicate host as a plain failure
fn conflict_or(err: KeaError) -> ManagerError {
    match err {
        KeaError::Conflict { text, .. } => ManagerError::Conflict(text),
        KeaError::CommandFailed { ref text, .. } if text.to_lowercase().contains("already exist") => {
            ManagerError::Conflict(text.clone())
        }
        other => other.into(),
    }
}

/// Check that `ip` may be reserved in `subnet`; `mac` must not already be
/// reserved there for a different address
pub(crate) fn check_placement(subnet: &Subnet4, ip: &str, mac: &str) -> Result<(), ManagerError> {
    let net = parse_subnet(&subnet.subnet).map_err(|_| {
        ManagerError::InvalidConfig(format!(
            "subnet {} has invalid prefix '{}'",
            subnet.id, subnet.subnet
        ))
    })?;
    let addr = parse_ipv4(ip)?;
    if !net.contains(&addr) {
        return Err(ManagerError::OutOfSubnet {
            ip: ip.to_string(),
            subnet: subnet.subnet.clone(),
        });
    }

    if let Some(existing) = subnet.reservations.iter().find(|r| {
        r.hw_address
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case(mac))
            && r.ip_address.as_deref() != Some(ip)
    }) {
        return Err(ManagerError::Conflict(format!(
            "MAC {} is already reserved for {} in subnet {}",
            mac,
            existing.ip_address.as_deref().unwrap_or("another address"),
            subnet.id
        )));
    }
    Ok(())
}

/// Add or replace (matching on IP) a reservation inside its subnet
pub(crate) fn insert_reservation(
    config: &mut Dhcp4Config,
    mut reservation: HostReservation,
) -> Result<(), ManagerError> {
    let subnet_id = reservation
        .subnet_id
        .take()
        .ok_or(ValidationError::MissingField("subnet-id"))?;
    let ip = reservation
        .ip_address
        .clone()
        .ok_or(ValidationError::MissingField("ip-address"))?;
    let mac = reservation.hw_address.clone().unwrap_or_default();

    let mut subnet = config
        .subnet(subnet_id)?
        .ok_or(ManagerError::SubnetNotFound(subnet_id))?;
    check_placement(&subnet, &ip, &mac)?;

    match subnet
        .reservations
        .iter_mut()
        .find(|r| r.ip_address.as_deref() == Some(ip.as_str()))
    {
        Some(existing) => *existing = reservation,
        None => subnet.reservations.push(reservation),
    }

    config.replace_subnet(&subnet)?;
    Ok(())
}

/// Remove the reservation for `ip` from a subnet; false when absent
pub(crate) fn remove_reservation(
    config: &mut Dhcp4Config,
    subnet_id: u32,
    ip: &str,
) -> Result<bool, ManagerError> {
    let mut subnet = config
        .subnet(subnet_id)?
        .ok_or(ManagerError::SubnetNotFound(subnet_id))?;

    let before = subnet.reservations.len();
    subnet
        .reservations
        .retain(|r| r.ip_address.as_deref() != Some(ip));
    if subnet.reservations.len() == before {
        return Ok(false);
    }

    config.replace_subnet(&subnet)?;
    Ok(true)
}
