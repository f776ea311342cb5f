//! Builders for test fixtures

use crate::models::{HostReservation, Lease4, Pool, Subnet4};
use serde_json::Map;

/// Subnet with a single pool and no reservations
pub fn test_subnet(id: u32, cidr: &str, pool: &str) -> Subnet4 {
    Subnet4 {
        id,
        subnet: cidr.to_string(),
        pools: vec![Pool::new(pool)],
        reservations: Vec::new(),
        option_data: Vec::new(),
        valid_lifetime: Some(4000),
        renew_timer: None,
        rebind_timer: None,
        extra: Map::new(),
    }
}

/// Active lease with a hostname
pub fn test_lease(ip: &str, mac: &str, subnet_id: u32) -> Lease4 {
    Lease4 {
        ip_address: ip.to_string(),
        hw_address: mac.to_string(),
        hostname: format!("host-{}", ip.replace('.', "-")),
        state: 0,
        subnet_id,
        valid_lft: Some(4000),
        cltt: Some(1_700_000_000),
        client_id: None,
        extra: Map::new(),
    }
}

/// Reservation as stored inside a subnet (no subnet-id)
pub fn test_reservation(ip: &str, mac: &str, hostname: Option<&str>) -> HostReservation {
    HostReservation {
        ip_address: Some(ip.to_string()),
        hw_address: Some(mac.to_string()),
        hostname: hostname.map(str::to_string),
        ..HostReservation::default()
    }
}
