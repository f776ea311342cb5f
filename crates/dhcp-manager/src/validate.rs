//! Input validation for addresses submitted from the browser

use ipnet::Ipv4Net;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Maximum number of DNS servers accepted per reservation or subnet
pub const MAX_DNS_SERVERS: usize = 4;

/// Validation failures, each naming the offending input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid IPv4 address '{0}'")]
    InvalidIpAddress(String),

    #[error("Invalid MAC address '{0}': expected six hex pairs like aa:bb:cc:dd:ee:ff")]
    InvalidMacAddress(String),

    #[error("Invalid DNS server '{0}': expected an IPv4 address like 8.8.8.8")]
    InvalidDnsServer(String),

    #[error("Empty DNS server entry in '{0}': check for a trailing or doubled comma")]
    EmptyDnsServer(String),

    #[error("Too many DNS servers ({0}); at most {MAX_DNS_SERVERS} are allowed")]
    TooManyDnsServers(usize),

    #[error("Invalid router address '{0}'")]
    InvalidRouter(String),

    #[error("Invalid hostname '{0}'")]
    InvalidHostname(String),

    #[error("Invalid pool '{0}': expected 'start - end' or a CIDR prefix")]
    InvalidPool(String),

    #[error("Invalid subnet '{0}'")]
    InvalidSubnet(String),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid timers: {0}")]
    InvalidTimers(String),
}

/// Parse a dotted-quad IPv4 address
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr, ValidationError> {
    input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidIpAddress(input.to_string()))
}

/// Normalize a MAC address to lower-case, colon separated form.
///
/// Accepts `:` or `-` as separator as long as it is used consistently.
pub fn normalize_mac(input: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidMacAddress(input.to_string());
    let trimmed = input.trim();

    let separator = if trimmed.contains(':') { ':' } else { '-' };
    let groups: Vec<&str> = trimmed.split(separator).collect();
    if groups.len() != 6 {
        return Err(invalid());
    }
    if groups
        .iter()
        .any(|g| g.len() != 2 || !g.chars().all(|c| c.is_ascii_hexdigit()))
    {
        return Err(invalid());
    }

    Ok(groups.join(":").to_ascii_lowercase())
}

/// Parse a comma (or comma-space) separated list of up to four IPv4 DNS servers.
///
/// An empty or whitespace-only string means "no custom DNS" and yields an
/// empty list. A trailing or doubled comma is an error, as is any token that
/// is not an IPv4 address.
pub fn parse_dns_servers(input: &str) -> Result<Vec<Ipv4Addr>, ValidationError> {
    parse_address_list(
        input,
        ValidationError::InvalidDnsServer,
        ValidationError::EmptyDnsServer,
    )
    .and_then(|servers| {
        if servers.len() > MAX_DNS_SERVERS {
            Err(ValidationError::TooManyDnsServers(servers.len()))
        } else {
            Ok(servers)
        }
    })
}

/// Parse a comma separated list of router addresses (DHCP option 3)
pub fn parse_routers(input: &str) -> Result<Vec<Ipv4Addr>, ValidationError> {
    parse_address_list(
        input,
        ValidationError::InvalidRouter,
        ValidationError::InvalidRouter,
    )
}

fn parse_address_list(
    input: &str,
    invalid: fn(String) -> ValidationError,
    empty: fn(String) -> ValidationError,
) -> Result<Vec<Ipv4Addr>, ValidationError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    input
        .split(',')
        .map(str::trim)
        .map(|token| {
            if token.is_empty() {
                return Err(empty(input.to_string()));
            }
            token.parse().map_err(|_| invalid(token.to_string()))
        })
        .collect()
}

/// Join addresses the way they are stored in KEA option data
pub fn join_addresses(addresses: &[Ipv4Addr]) -> String {
    addresses
        .iter()
        .map(Ipv4Addr::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate an optional hostname; blank means none
pub fn validate_hostname(input: &str) -> Result<Option<String>, ValidationError> {
    let hostname = input.trim();
    if hostname.is_empty() {
        return Ok(None);
    }

    let invalid = || ValidationError::InvalidHostname(input.to_string());
    if hostname.len() > 253 {
        return Err(invalid());
    }
    for label in hostname.trim_end_matches('.').split('.') {
        if label.is_empty()
            || label.len() > 63
            || label.starts_with('-')
            || label.ends_with('-')
            || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(invalid());
        }
    }

    Ok(Some(hostname.to_string()))
}

/// Parse a subnet prefix such as "192.168.1.0/24"
pub fn parse_subnet(input: &str) -> Result<Ipv4Net, ValidationError> {
    input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidSubnet(input.to_string()))
}

/// Address range covered by a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolRange {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
}

impl PoolRange {
    /// True when the whole range lies inside `net`
    pub fn within(&self, net: &Ipv4Net) -> bool {
        net.contains(&self.start) && net.contains(&self.end)
    }
}

/// Parse a pool given as "start - end" or as a CIDR prefix.
///
/// Returns the normalized KEA pool string and the covered range.
pub fn parse_pool(input: &str) -> Result<(String, PoolRange), ValidationError> {
    let invalid = || ValidationError::InvalidPool(input.to_string());
    let trimmed = input.trim();

    if let Some((start, end)) = trimmed.split_once('-') {
        let start: Ipv4Addr = start.trim().parse().map_err(|_| invalid())?;
        let end: Ipv4Addr = end.trim().parse().map_err(|_| invalid())?;
        if start > end {
            return Err(invalid());
        }
        return Ok((format!("{} - {}", start, end), PoolRange { start, end }));
    }

    let net: Ipv4Net = trimmed.parse().map_err(|_| invalid())?;
    let net = net.trunc();
    Ok((
        net.to_string(),
        PoolRange {
            start: net.network(),
            end: net.broadcast(),
        },
    ))
}
