//! Shared application state

use crate::config::AppConfig;
use crate::metrics::Metrics;
use dhcp_manager::DhcpManager;
use kea_client::{KeaClient, KeaError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// State handed to every handler.
///
/// Saving the configuration swaps both the configuration and the manager,
/// so later requests talk to the new Control Agent.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: RwLock<AppConfig>,
    manager: RwLock<DhcpManager>,
    config_path: PathBuf,
    metrics: Metrics,
}

/// Manager talking to the Control Agent named in `config`
pub fn build_manager(config: &AppConfig) -> Result<DhcpManager, KeaError> {
    let client = KeaClient::new(config.client_config())?;
    Ok(DhcpManager::new(Arc::new(client), config.manager_options()))
}

impl AppState {
    pub fn new(
        config: AppConfig,
        config_path: PathBuf,
        manager: DhcpManager,
        metrics: Metrics,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: RwLock::new(config),
                manager: RwLock::new(manager),
                config_path,
                metrics,
            }),
        }
    }

    /// Current manager; cheap to clone
    pub async fn manager(&self) -> DhcpManager {
        self.inner.manager.read().await.clone()
    }

    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    pub fn config_path(&self) -> &Path {
        &self.inner.config_path
    }

    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    /// Install a new configuration together with its manager
    pub async fn replace(&self, config: AppConfig, manager: DhcpManager) {
        let mut current_config = self.inner.config.write().await;
        let mut current_manager = self.inner.manager.write().await;
        *current_config = config;
        *current_manager = manager;
    }
}
