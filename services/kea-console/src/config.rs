//! Console configuration
//!
//! Loaded from a YAML file whose path comes from `CONFIG_PATH`
//! (default `config.yaml`). Every field has a default, so a partial file
//! only overrides what it names.

use dhcp_manager::ManagerOptions;
use kea_client::KeaClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
/// Used when `CONFIG_PATH` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
/// Placeholder returned instead of a stored password
pub const MASKED_PASSWORD: &str = "***";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub kea: KeaSettings,
    pub app: ServerSettings,
    pub logging: LoggingSettings,
}

/// Control Agent connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeaSettings {
    pub control_agent_url: String,
    pub username: String,
    pub password: String,
    pub default_subnet_id: u32,
    pub timeout_secs: u64,
    /// Issue `config-write` after configuration changes
    pub persist_config: bool,
}

impl Default for KeaSettings {
    fn default() -> Self {
        Self {
            control_agent_url: "http://localhost:8000".to_string(),
            username: String::new(),
            password: String::new(),
            default_subnet_id: 1,
            timeout_secs: 10,
            persist_config: false,
        }
    }
}

/// HTTP listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// `json` for JSON lines, anything else for compact text
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            format: "text".to_string(),
        }
    }
}

impl LoggingSettings {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Path of the configuration file
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl AppConfig {
    /// Read the file at `path`; `Ok(None)` when it does not exist
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_yaml(&contents).map(Some)
    }

    /// Parse YAML; an empty document yields the defaults
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Write the configuration as YAML, replacing the file atomically
    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        tokio::fs::write(&tmp, yaml).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(write_err)?;
        Ok(())
    }

    /// Reject settings the console cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.kea.control_agent_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "kea.control_agent_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.kea.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "kea.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.kea.default_subnet_id == 0 {
            return Err(ConfigError::Invalid(
                "kea.default_subnet_id must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy safe to hand to the browser
    pub fn sanitized(&self) -> Self {
        let mut copy = self.clone();
        if !copy.kea.password.is_empty() {
            copy.kea.password = MASKED_PASSWORD.to_string();
        }
        copy
    }

    /// A masked password coming back from the browser keeps the stored one
    pub fn restore_masked_password(&mut self, current: &AppConfig) {
        if self.kea.password == MASKED_PASSWORD && !current.kea.password.is_empty() {
            self.kea.password = current.kea.password.clone();
        }
    }

    pub fn client_config(&self) -> KeaClientConfig {
        KeaClientConfig::new(self.kea.control_agent_url.trim())
            .with_credentials(&self.kea.username, &self.kea.password)
            .with_timeout(Duration::from_secs(self.kea.timeout_secs))
    }

    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            default_subnet_id: self.kea.default_subnet_id,
            persist_config: self.kea.persist_config,
        }
    }

    /// Filter directive for tracing; debug mode forces `debug`
    pub fn log_directive(&self) -> String {
        if self.app.debug {
            "debug".to_string()
        } else {
            match self.logging.level.trim().to_lowercase().as_str() {
                "warning" => "warn".to_string(),
                "critical" | "fatal" => "error".to_string(),
                "" => "info".to_string(),
                level => level.to_string(),
            }
        }
    }
}
