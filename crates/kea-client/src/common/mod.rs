//! HTTP transport for the Control Agent
//!
//! Wraps a `reqwest::Client` with the agent URL and optional basic-auth
//! credentials. Every command is a POST of the envelope to the agent root.

use crate::command::{parse_response, CommandResponse, KeaCommand};
use crate::error::KeaError;
use reqwest::Client;
use tracing::{debug, error};

/// Basic-auth credentials for the Control Agent
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Credentials are only used when both parts are non-empty
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some(Self {
                username: u.to_string(),
                password: p.to_string(),
            }),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// HTTP client wrapper with authentication
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    url: String,
    credentials: Option<Credentials>,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, url: String, credentials: Option<Credentials>) -> Self {
        Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Get the Control Agent URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// True when requests carry basic-auth credentials
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// POST a command envelope and decode the first service response.
    ///
    /// Only transport and decoding failures are errors here; KEA result
    /// codes are left to [`crate::command::check`].
    pub async fn post_command(&self, command: &KeaCommand) -> Result<CommandResponse, KeaError> {
        debug!("Sending command to KEA: {}", command.command);

        let mut request = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .json(command);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await.map_err(|e| {
            error!("Failed to communicate with KEA: {}", e);
            KeaError::Http(e)
        })?;

        let status = response.status();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(KeaError::Authentication(format!(
                "Control Agent rejected credentials: {} - {}",
                status, body
            )));
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(KeaError::Api(format!(
                "{} failed: {} - {}",
                command.command,
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        parse_response(&body)
    }
}
