//! KEA Control Agent client
//!
//! Implements the DHCPv4 commands used by the console on top of
//! [`HttpClient`]. Commands provided by hook libraries (`reservation-*`,
//! `lease4-*`) fail with [`KeaError::Unsupported`] when the library is not
//! loaded; choosing a fallback is left to the caller.

use crate::command::{check, CommandResponse, KeaCommand};
use crate::common::{Credentials, HttpClient};
use crate::config::Dhcp4Config;
use crate::error::KeaError;
use crate::kea_trait::KeaClientTrait;
use crate::models::{HostReservation, Lease4, LeasePage};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Default request timeout for Control Agent calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`KeaClient`]
#[derive(Debug, Clone)]
pub struct KeaClientConfig {
    /// Control Agent URL (e.g., "http://localhost:8000")
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl KeaClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// KEA Control Agent client
#[derive(Debug, Clone)]
pub struct KeaClient {
    http: HttpClient,
}

impl KeaClient {
    /// Create a new KEA client
    ///
    /// # Arguments
    /// * `config` - Control Agent URL, optional basic-auth credentials and timeout
    pub fn new(config: KeaClientConfig) -> Result<Self, KeaError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(KeaError::Http)?;

        let credentials =
            Credentials::from_parts(config.username.as_deref(), config.password.as_deref());
        if credentials.is_some() {
            debug!("Using basic authentication for the Control Agent");
        }

        Ok(Self {
            http: HttpClient::new(client, config.url, credentials),
        })
    }

    /// Send a DHCPv4 command and normalize the result code
    ///
    /// # Returns
    /// * `Ok(CommandResponse)` - result code 0 (success) or 3 (empty)
    /// * `Err(KeaError)` - transport failure, unsupported command or KEA error
    pub async fn send_command(
        &self,
        command: &str,
        arguments: Option<Value>,
    ) -> Result<CommandResponse, KeaError> {
        let mut envelope = KeaCommand::dhcp4(command);
        if let Some(arguments) = arguments {
            envelope = envelope.with_arguments(arguments);
        }
        let response = self.http.post_command(&envelope).await?;
        check(command, response)
    }
}

#[async_trait::async_trait]
impl KeaClientTrait for KeaClient {
    fn url(&self) -> &str {
        self.http.url()
    }

    async fn version_get(&self) -> Result<String, KeaError> {
        let response = self.send_command("version-get", None).await?;
        let version = response
            .arguments()
            .get("extended")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| response.text.clone())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(version)
    }

    async fn list_commands(&self) -> Result<Vec<String>, KeaError> {
        let response = self.send_command("list-commands", None).await?;
        let commands: Vec<String> = match response.arguments {
            Some(arguments) => serde_json::from_value(arguments)?,
            None => Vec::new(),
        };
        Ok(commands)
    }

    async fn config_get(&self) -> Result<Dhcp4Config, KeaError> {
        let response = self.send_command("config-get", None).await?;
        Dhcp4Config::from_arguments(response.arguments())
    }

    async fn config_set(&self, config: &Dhcp4Config) -> Result<(), KeaError> {
        self.send_command("config-set", Some(config.to_arguments()))
            .await?;
        info!("Applied configuration via config-set");
        Ok(())
    }

    async fn config_write(&self) -> Result<(), KeaError> {
        self.send_command("config-write", None).await?;
        info!("Persisted running configuration via config-write");
        Ok(())
    }

    async fn lease4_get_all(&self) -> Result<Vec<Lease4>, KeaError> {
        let response = self.send_command("lease4-get-all", None).await?;
        if response.is_empty() {
            return Ok(Vec::new());
        }
        let page: LeasePage = serde_json::from_value(response.arguments().clone())?;
        info!("Retrieved {} leases using lease4-get-all", page.leases.len());
        Ok(page.leases)
    }

    async fn lease4_get_page(&self, from: &str, limit: u32) -> Result<Vec<Lease4>, KeaError> {
        let arguments = json!({ "from": from, "limit": limit });
        debug!("Fetching lease page from {}", from);
        let response = self.send_command("lease4-get-page", Some(arguments)).await?;
        if response.is_empty() {
            return Ok(Vec::new());
        }
        let page: LeasePage = serde_json::from_value(response.arguments().clone())?;
        Ok(page.leases)
    }

    async fn reservation_add(&self, reservation: &HostReservation) -> Result<(), KeaError> {
        let arguments = json!({ "reservation": reservation });
        self.send_command("reservation-add", Some(arguments)).await?;
        info!(
            "Created reservation: IP={}, MAC={}",
            reservation.ip_address.as_deref().unwrap_or("-"),
            reservation.hw_address.as_deref().unwrap_or("-")
        );
        Ok(())
    }

    async fn reservation_del(&self, subnet_id: u32, ip_address: &str) -> Result<bool, KeaError> {
        let arguments = json!({ "subnet-id": subnet_id, "ip-address": ip_address });
        let response = self.send_command("reservation-del", Some(arguments)).await?;
        if response.is_empty() {
            debug!("reservation-del found nothing for {} in subnet {}", ip_address, subnet_id);
            return Ok(false);
        }
        info!("Deleted reservation: IP={}", ip_address);
        Ok(true)
    }
}
