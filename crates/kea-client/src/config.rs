//! Running DHCPv4 configuration as returned by `config-get`
//!
//! The `Dhcp4` object is kept as raw JSON. Subnets are decoded into
//! [`Subnet4`] on demand and encoded back in place, so `config-set` pushes
//! exactly what was read plus the intended change.

use crate::error::KeaError;
use crate::models::Subnet4;
use serde_json::{json, Map, Value};

const SUBNET4: &str = "subnet4";
const SHARED_NETWORKS: &str = "shared-networks";

/// The `Dhcp4` section of a KEA configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dhcp4Config {
    inner: Map<String, Value>,
}

impl Dhcp4Config {
    /// Wrap a raw `Dhcp4` object
    pub fn new(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    /// Extract the `Dhcp4` object from `config-get` arguments
    pub fn from_arguments(arguments: &Value) -> Result<Self, KeaError> {
        match arguments.get("Dhcp4") {
            Some(Value::Object(map)) => Ok(Self::new(map.clone())),
            Some(_) => Err(KeaError::InvalidResponse(
                "config-get returned a non-object Dhcp4 section".to_string(),
            )),
            None => Err(KeaError::InvalidResponse(
                "config-get response has no Dhcp4 section".to_string(),
            )),
        }
    }

    /// Arguments for `config-set`
    pub fn to_arguments(&self) -> Value {
        json!({ "Dhcp4": Value::Object(self.inner.clone()) })
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.inner
    }

    /// All subnets with the name of their shared network, if any.
    ///
    /// Top-level subnets come first, then those nested in
    /// `shared-networks`, in configuration order.
    pub fn subnets(&self) -> Result<Vec<(Subnet4, Option<String>)>, KeaError> {
        let mut subnets = Vec::new();

        for value in list(&self.inner, SUBNET4) {
            subnets.push((serde_json::from_value(value.clone())?, None));
        }

        for network in list(&self.inner, SHARED_NETWORKS) {
            let Some(network) = network.as_object() else {
                continue;
            };
            let name = network
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string);
            for value in list(network, SUBNET4) {
                subnets.push((serde_json::from_value(value.clone())?, name.clone()));
            }
        }

        Ok(subnets)
    }

    /// Subnet with the given id
    pub fn subnet(&self, id: u32) -> Result<Option<Subnet4>, KeaError> {
        Ok(self
            .subnets()?
            .into_iter()
            .map(|(subnet, _)| subnet)
            .find(|subnet| subnet.id == id))
    }

    /// Replace the subnet with the same id in place.
    ///
    /// Returns `false` when no subnet has that id.
    pub fn replace_subnet(&mut self, subnet: &Subnet4) -> Result<bool, KeaError> {
        let encoded = serde_json::to_value(subnet)?;

        if let Some(slot) = find_subnet_mut(&mut self.inner, subnet.id) {
            *slot = encoded;
            return Ok(true);
        }

        if let Some(Value::Array(networks)) = self.inner.get_mut(SHARED_NETWORKS) {
            for network in networks.iter_mut() {
                let Some(network) = network.as_object_mut() else {
                    continue;
                };
                if let Some(slot) = find_subnet_mut(network, subnet.id) {
                    *slot = encoded;
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// Append a subnet to the top-level `subnet4` list
    pub fn add_subnet(&mut self, subnet: &Subnet4) -> Result<(), KeaError> {
        let encoded = serde_json::to_value(subnet)?;
        match self
            .inner
            .entry(SUBNET4)
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(subnets) => {
                subnets.push(encoded);
                Ok(())
            }
            _ => Err(KeaError::InvalidResponse(
                "subnet4 is not a list".to_string(),
            )),
        }
    }

    /// Lease backend type (`memfile`, `mysql`, `postgresql`)
    pub fn lease_database_type(&self) -> String {
        self.inner
            .get("lease-database")
            .and_then(|db| db.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("memfile")
            .to_string()
    }
}

fn list<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    map.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn find_subnet_mut(map: &mut Map<String, Value>, id: u32) -> Option<&mut Value> {
    let Some(Value::Array(subnets)) = map.get_mut(SUBNET4) else {
        return None;
    };
    subnets
        .iter_mut()
        .find(|s| s.get("id").and_then(Value::as_u64) == Some(u64::from(id)))
}
