//! Prometheus metrics for the console.
//!
//! The registry is owned by the application state and exposed on
//! `GET /metrics`.
//!
//! - `kea_console_operations_total{operation, outcome}`: console operations
//!   by outcome (`success`, `error`)
//! - `kea_console_reservation_writes_total{method}`: reservation changes by
//!   how they reached KEA (`host-cmds`, `config-set`)

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Namespace prefix for all console metrics
const METRICS_NAMESPACE: &str = "kea_console";

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    operations: IntCounterVec,
    reservation_writes: IntCounterVec,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let operations = IntCounterVec::new(
            Opts::new(
                format!("{METRICS_NAMESPACE}_operations_total"),
                "Total number of console operations by operation and outcome",
            ),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(operations.clone()))?;

        let reservation_writes = IntCounterVec::new(
            Opts::new(
                format!("{METRICS_NAMESPACE}_reservation_writes_total"),
                "Total number of reservation changes by write method",
            ),
            &["method"],
        )?;
        registry.register(Box::new(reservation_writes.clone()))?;

        Ok(Self {
            registry,
            operations,
            reservation_writes,
        })
    }

    /// Count one operation
    pub fn record_operation(&self, operation: &str, success: bool) {
        let outcome = if success { "success" } else { "error" };
        self.operations
            .with_label_values(&[operation, outcome])
            .inc();
    }

    /// Count one reservation change
    pub fn record_reservation_write(&self, method: &str) {
        self.reservation_writes.with_label_values(&[method]).inc();
    }

    /// Gather and encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
