//! Bulk import and export of reservations

use super::reservations::{check_placement, WriteMethod};
use super::DhcpManager;
use crate::error::ManagerError;
use crate::translate::{from_kea, to_kea, ReservationForm};
use chrono::{SecondsFormat, Utc};
use kea_client::Subnet4;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Import request body: `{"reservations": [...]}` or a bare array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ImportPayload {
    Wrapped { reservations: Vec<Value> },
    Bare(Vec<Value>),
}

impl ImportPayload {
    pub fn into_records(self) -> Vec<Value> {
        match self {
            ImportPayload::Wrapped { reservations } => reservations,
            ImportPayload::Bare(records) => records,
        }
    }
}

/// Why one record of an import was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImportFailure {
    pub index: usize,
    pub ip_address: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub failures: Vec<ImportFailure>,
    /// Write path of each created reservation
    #[serde(skip)]
    pub methods: Vec<WriteMethod>,
}

/// Export file contents; `reservations` can be fed back to import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExportDocument {
    pub exported_at: String,
    pub count: usize,
    pub reservations: Vec<ReservationForm>,
}

impl DhcpManager {
    /// Create every record independently.
    ///
    /// Subnets are fetched once up front; a record that fails (undecodable,
    /// invalid, unknown subnet, out of subnet, duplicate in the batch,
    /// rejected by KEA) is reported and the next record is processed.
    pub async fn import_reservations(
        &self,
        records: &[Value],
    ) -> Result<ImportSummary, ManagerError> {
        let config = self.client.config_get().await?;
        let mut subnets: HashMap<u32, Subnet4> = config
            .subnets()?
            .into_iter()
            .map(|(subnet, _)| (subnet.id, subnet))
            .collect();
        let mut seen: HashSet<String> = HashSet::new();

        let mut summary = ImportSummary {
            total: records.len(),
            ..ImportSummary::default()
        };

        for (index, raw) in records.iter().enumerate() {
            let ip_hint = raw
                .get("ip-address")
                .or_else(|| raw.get("ip_address"))
                .and_then(Value::as_str)
                .map(str::to_string);

            match self.import_one(raw, &mut subnets, &seen).await {
                Ok((ip, method)) => {
                    debug!("Imported reservation {} ({}) via {}", index, ip, method);
                    seen.insert(ip);
                    summary.created += 1;
                    summary.methods.push(method);
                }
                Err(reason) => {
                    warn!("Import record {} failed: {}", index, reason);
                    summary.failures.push(ImportFailure {
                        index,
                        ip_address: ip_hint,
                        reason,
                    });
                }
            }
        }

        summary.failed = summary.failures.len();
        info!(
            "Import finished: {} total, {} created, {} failed",
            summary.total, summary.created, summary.failed
        );
        Ok(summary)
    }

    async fn import_one(
        &self,
        raw: &Value,
        subnets: &mut HashMap<u32, Subnet4>,
        seen: &HashSet<String>,
    ) -> Result<(String, WriteMethod), String> {
        let form: ReservationForm =
            serde_json::from_value(raw.clone()).map_err(|e| format!("invalid record: {}", e))?;
        let reservation =
            to_kea(&form, self.options.default_subnet_id).map_err(|e| e.to_string())?;

        let ip = reservation.ip_address.clone().unwrap_or_default();
        let mac = reservation.hw_address.clone().unwrap_or_default();
        let subnet_id = reservation
            .subnet_id
            .unwrap_or(self.options.default_subnet_id);

        if seen.contains(&ip) {
            return Err(format!("duplicate IP address {} in import", ip));
        }
        let subnet = subnets
            .get_mut(&subnet_id)
            .ok_or_else(|| ManagerError::SubnetNotFound(subnet_id).to_string())?;
        if let Some(existing) = subnet.reservation_by_ip(&ip) {
            return Err(format!(
                "duplicate IP address {} already reserved for {}",
                ip,
                existing.hw_address.as_deref().unwrap_or("another host")
            ));
        }
        check_placement(subnet, &ip, &mac).map_err(|e| e.to_string())?;

        let outcome = self
            .create_reservation(&form)
            .await
            .map_err(|e| e.to_string())?;

        let mut stored = reservation;
        stored.subnet_id = None;
        subnet.reservations.push(stored);
        Ok((ip, outcome.method))
    }

    /// Every reservation that can be expressed as a browser record
    pub async fn export_reservations(
        &self,
        subnet_id: Option<u32>,
    ) -> Result<ExportDocument, ManagerError> {
        let config = self.client.config_get().await?;

        let mut reservations = Vec::new();
        let mut skipped = 0usize;
        for (subnet, _) in config.subnets()? {
            if subnet_id.is_some_and(|id| id != subnet.id) {
                continue;
            }
            for reservation in &subnet.reservations {
                match from_kea(reservation, subnet.id) {
                    Some(form) => reservations.push(form),
                    None => skipped += 1,
                }
            }
        }
        if skipped > 0 {
            debug!("Skipped {} reservations without IP or MAC address", skipped);
        }

        info!("Exported {} reservations", reservations.len());
        Ok(ExportDocument {
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            count: reservations.len(),
            reservations,
        })
    }
}
