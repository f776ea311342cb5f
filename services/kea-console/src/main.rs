//! KEA DHCP Console
//!
//! Web console for a KEA DHCPv4 server: lists leases, promotes them to
//! permanent reservations, edits per-subnet settings and moves
//! reservations in and out in bulk. Every operation is relayed to KEA's
//! Control Agent; KEA stays the system of record.

mod config;
#[cfg(test)]
mod config_test;
mod error;
mod metrics;
mod routes;
#[cfg(test)]
mod routes_test;
mod state;

use anyhow::{Context, Result};
use config::{config_path, AppConfig};
use metrics::Metrics;
use state::{build_manager, AppState};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let path = config_path();

    // Logging depends on the configuration, so load problems are reported
    // once the subscriber is installed.
    let (config, load_message) = match AppConfig::load(&path) {
        Ok(Some(config)) => (config, format!("Loaded configuration from {}", path.display())),
        Ok(None) => (
            AppConfig::default(),
            format!("No config file found at {}, using defaults", path.display()),
        ),
        Err(e) => (
            AppConfig::default(),
            format!("Error loading config, using defaults: {}", e),
        ),
    };

    init_logging(&config);
    info!("{}", load_message);
    if let Err(e) = config.validate() {
        warn!("{}", e);
    }

    debug!("Connecting to KEA Control Agent at {}", config.kea.control_agent_url);
    let manager = build_manager(&config).context("Failed to create KEA client")?;
    let metrics = Metrics::new().context("Failed to register metrics")?;

    let addr = format!("{}:{}", config.app.host, config.app.port);
    let state = AppState::new(config, path, manager, metrics);
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting KEA DHCP Console on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("KEA DHCP Console stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level; `RUST_LOG_FORMAT=json` or
/// `logging.format: json` selects JSON output
fn init_logging(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(config.log_directive()))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = std::env::var("RUST_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or_else(|_| config.logging.is_json());

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_ansi(true)
            .compact()
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
