//! Translation between browser reservation records and KEA host reservations
//!
//! The browser works with a flat record carrying an optional `dns-servers`
//! string. KEA stores the same information as a host reservation whose
//! `option-data` list holds a `domain-name-servers` entry. [`to_kea`] and
//! [`from_kea`] are inverse to each other: the DNS string produced by
//! [`from_kea`] is exactly the comma-space joined string [`to_kea`] stored.

use crate::validate::{
    join_addresses, normalize_mac, parse_dns_servers, parse_ipv4, validate_hostname,
    ValidationError,
};
use kea_client::{HostReservation, OptionData, OPTION_DOMAIN_NAME_SERVERS};
use serde::{Deserialize, Deserializer, Serialize};

/// Reservation record as exchanged with the browser and in export files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReservationForm {
    #[serde(default, alias = "ip_address")]
    pub ip_address: String,
    #[serde(default, alias = "hw_address")]
    pub hw_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(
        default,
        alias = "subnet_id",
        deserialize_with = "subnet_id_from_number_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub subnet_id: Option<u32>,
    #[serde(default, alias = "dns_servers", skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<String>,
}

/// HTML forms and query strings submit select values as strings; a blank
/// value means no subnet
pub fn subnet_id_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(id)) => Ok(Some(id)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid subnet id '{}'", text))),
    }
}

/// Validate a browser record and build the KEA reservation for `reservation-add`.
///
/// `subnet-id` falls back to `default_subnet` and is carried inside the
/// reservation as host_cmds expects.
pub fn to_kea(form: &ReservationForm, default_subnet: u32) -> Result<HostReservation, ValidationError> {
    if form.ip_address.trim().is_empty() {
        return Err(ValidationError::MissingField("ip-address"));
    }
    if form.hw_address.trim().is_empty() {
        return Err(ValidationError::MissingField("hw-address"));
    }

    let ip = parse_ipv4(&form.ip_address)?;
    let mac = normalize_mac(&form.hw_address)?;
    let hostname = match form.hostname.as_deref() {
        Some(hostname) => validate_hostname(hostname)?,
        None => None,
    };

    let mut option_data = Vec::new();
    if let Some(dns) = form.dns_servers.as_deref() {
        let servers = parse_dns_servers(dns)?;
        if !servers.is_empty() {
            option_data.push(OptionData::named(
                OPTION_DOMAIN_NAME_SERVERS,
                join_addresses(&servers),
            ));
        }
    }

    Ok(HostReservation {
        ip_address: Some(ip.to_string()),
        hw_address: Some(mac),
        hostname,
        subnet_id: Some(form.subnet_id.unwrap_or(default_subnet)),
        option_data,
        ..HostReservation::default()
    })
}

/// Browser record for a KEA reservation.
///
/// Returns `None` for reservations keyed by something other than a MAC
/// address, or without a fixed IP.
pub fn from_kea(reservation: &HostReservation, subnet_id: u32) -> Option<ReservationForm> {
    let ip_address = reservation.ip_address.clone()?;
    let hw_address = reservation.hw_address.clone()?;

    Some(ReservationForm {
        ip_address,
        hw_address,
        hostname: reservation.hostname.clone().filter(|h| !h.is_empty()),
        subnet_id: Some(reservation.subnet_id.unwrap_or(subnet_id)),
        dns_servers: dns_servers_from_options(&reservation.option_data),
    })
}

/// `domain-name-servers` data string, if present
pub fn dns_servers_from_options(options: &[OptionData]) -> Option<String> {
    option_value(options, OPTION_DOMAIN_NAME_SERVERS).map(str::to_string)
}

/// Data of the named option
pub fn option_value<'a>(options: &'a [OptionData], name: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|o| o.is_named(name))
        .map(|o| o.data.as_str())
}

/// Set the named option, replacing an existing entry in place
pub fn set_option(options: &mut Vec<OptionData>, name: &str, data: impl Into<String>) {
    let data = data.into();
    match options.iter_mut().find(|o| o.is_named(name)) {
        Some(existing) => existing.data = data,
        None => options.push(OptionData::named(name, data)),
    }
}

/// Remove the named option; returns true when something was removed
pub fn remove_option(options: &mut Vec<OptionData>, name: &str) -> bool {
    let before = options.len();
    options.retain(|o| !o.is_named(name));
    options.len() != before
}
