//! KEA API models
//!
//! These models follow the JSON produced by KEA's `config-get`,
//! `lease4-get-*` and host_cmds commands. Unknown keys are kept in
//! `extra` so a record read from KEA can be written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Option name KEA uses for DHCP option 6
pub const OPTION_DOMAIN_NAME_SERVERS: &str = "domain-name-servers";
/// Option name KEA uses for DHCP option 3
pub const OPTION_ROUTERS: &str = "routers";
/// Option name KEA uses for DHCP option 15
pub const OPTION_DOMAIN_NAME: &str = "domain-name";

fn unknown_hw_address() -> String {
    "unknown".to_string()
}

/// DHCPv4 lease as returned by `lease4-get-all` / `lease4-get-page`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Lease4 {
    pub ip_address: String,
    #[serde(default = "unknown_hw_address")]
    pub hw_address: String,
    #[serde(default)]
    pub hostname: String,
    /// 0 = default, 1 = declined, 2 = expired-reclaimed
    #[serde(default)]
    pub state: u32,
    #[serde(default)]
    pub subnet_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_lft: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cltt: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of `lease4-get-page` results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeasePage {
    #[serde(default)]
    pub leases: Vec<Lease4>,
    #[serde(default)]
    pub count: u64,
}

/// Entry of an `option-data` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(default)]
    pub data: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OptionData {
    /// Named option with a data string
    pub fn named(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            code: None,
            data: data.into(),
            extra: Map::new(),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// Host reservation in KEA's native shape.
///
/// Inside a subnet's `reservations` list `subnet-id` is absent; the
/// `reservation-add` command carries it inside the reservation instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HostReservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hw_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_data: Vec<OptionData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Address pool of a subnet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub pool: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Pool {
    pub fn new(pool: impl Into<String>) -> Self {
        Self {
            pool: pool.into(),
            extra: Map::new(),
        }
    }
}

/// DHCPv4 subnet from the `subnet4` list of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Subnet4 {
    pub id: u32,
    /// CIDR, e.g. "192.168.1.0/24"
    pub subnet: String,
    #[serde(default)]
    pub pools: Vec<Pool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reservations: Vec<HostReservation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_data: Vec<OptionData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_lifetime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renew_timer: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebind_timer: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subnet4 {
    /// Reservation holding the given IP address
    pub fn reservation_by_ip(&self, ip: &str) -> Option<&HostReservation> {
        self.reservations
            .iter()
            .find(|r| r.ip_address.as_deref() == Some(ip))
    }
}
