//! Unit tests for import and export

#[cfg(test)]
mod tests {
    use crate::manager::transfer::ImportPayload;
    use crate::manager::{DhcpManager, ManagerOptions};
    use crate::WriteMethod;
    use kea_client::mock::{test_reservation, test_subnet};
    use kea_client::MockKeaClient;
    use serde_json::json;
    use std::sync::Arc;

    fn mock() -> MockKeaClient {
        let mock = MockKeaClient::new("http://kea-test:8000");
        mock.add_subnet(test_subnet(1, "192.168.1.0/24", "192.168.1.100 - 192.168.1.200"));
        mock.add_subnet(test_subnet(2, "10.0.0.0/24", "10.0.0.100 - 10.0.0.200"));
        mock
    }

    fn manager(mock: &MockKeaClient) -> DhcpManager {
        DhcpManager::new(Arc::new(mock.clone()), ManagerOptions::default())
    }

    #[tokio::test]
    async fn test_import_continues_after_failures() {
        let mock = mock();
        let records = vec![
            json!({ "ip-address": "192.168.1.10", "hw-address": "aa:bb:cc:dd:ee:01" }),
            json!({ "ip-address": "192.168.1.10", "hw-address": "aa:bb:cc:dd:ee:02" }),
            json!({ "ip-address": "10.0.0.10", "hw-address": "aa:bb:cc:dd:ee:03", "subnet-id": 1 }),
            json!({ "ip-address": "192.168.1.12", "hw-address": "not-a-mac" }),
            json!({ "ip-address": "192.168.1.13", "hw-address": "aa:bb:cc:dd:ee:05", "subnet-id": 9 }),
            json!("garbage"),
            json!({ "ip_address": "10.0.0.11", "hw_address": "aa:bb:cc:dd:ee:06", "subnet_id": 2, "dns_servers": "8.8.8.8" }),
        ];

        let summary = manager(&mock).import_reservations(&records).await.unwrap();
        assert_eq!(summary.total, 7);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.failed, 5);

        let failed: Vec<usize> = summary.failures.iter().map(|f| f.index).collect();
        assert_eq!(failed, vec![1, 2, 3, 4, 5]);
        assert!(summary.failures[0].reason.contains("duplicate"));
        assert!(summary.failures[1].reason.contains("outside subnet"));
        assert!(summary.failures[2].reason.contains("not-a-mac"));
        assert!(summary.failures[3].reason.contains("Subnet 9"));
        assert_eq!(summary.failures[4].ip_address, None);
        assert_eq!(summary.failures[0].ip_address.as_deref(), Some("192.168.1.10"));

        assert_eq!(mock.subnet(1).unwrap().reservations.len(), 1);
        assert_eq!(mock.subnet(2).unwrap().reservations.len(), 1);
    }

    #[tokio::test]
    async fn test_import_detects_mac_reused_within_batch() {
        let mock = mock();
        let records = vec![
            json!({ "ip-address": "192.168.1.10", "hw-address": "aa:bb:cc:dd:ee:01" }),
            json!({ "ip-address": "192.168.1.11", "hw-address": "aa:bb:cc:dd:ee:01" }),
        ];
        let summary = manager(&mock).import_reservations(&records).await.unwrap();
        assert_eq!(summary.created, 1);
        assert!(summary.failures[0].reason.contains("already reserved"));
    }

    #[tokio::test]
    async fn test_import_keeps_existing_reservation_without_host_cmds() {
        let mock = mock().without_host_cmds();
        let mut subnet = mock.subnet(1).unwrap();
        subnet
            .reservations
            .push(test_reservation("192.168.1.10", "aa:bb:cc:dd:ee:01", Some("printer")));
        mock.add_subnet(subnet);

        let records = vec![
            json!({ "ip-address": "192.168.1.10", "hw-address": "aa:bb:cc:dd:ee:99", "hostname": "laptop" }),
            json!({ "ip-address": "192.168.1.11", "hw-address": "aa:bb:cc:dd:ee:02" }),
        ];
        let summary = manager(&mock).import_reservations(&records).await.unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].index, 0);
        assert!(summary.failures[0].reason.contains("already reserved"));

        let stored = mock.subnet(1).unwrap();
        let kept = stored.reservation_by_ip("192.168.1.10").unwrap();
        assert_eq!(kept.hw_address.as_deref(), Some("aa:bb:cc:dd:ee:01"));
        assert_eq!(kept.hostname.as_deref(), Some("printer"));
        assert!(stored.reservation_by_ip("192.168.1.11").is_some());
        assert_eq!(summary.methods, vec![WriteMethod::ConfigSet]);
    }

    #[tokio::test]
    async fn test_import_fetches_config_once_up_front() {
        let mock = mock();
        let records = vec![
            json!({ "ip-address": "192.168.1.10", "hw-address": "aa:bb:cc:dd:ee:01" }),
            json!({ "ip-address": "192.168.1.11", "hw-address": "aa:bb:cc:dd:ee:02" }),
        ];
        let summary = manager(&mock).import_reservations(&records).await.unwrap();
        assert_eq!(summary.methods, vec![WriteMethod::HostCmds, WriteMethod::HostCmds]);
        assert_eq!(
            mock.commands(),
            vec!["config-get", "reservation-add", "reservation-add"]
        );
    }

    #[tokio::test]
    async fn test_export_is_import_compatible() {
        let source = mock();
        let mut subnet = source.subnet(1).unwrap();
        subnet
            .reservations
            .push(test_reservation("192.168.1.10", "aa:bb:cc:dd:ee:01", Some("printer")));
        source.add_subnet(subnet);
        manager(&source)
            .create_reservation(&crate::ReservationForm {
                ip_address: "10.0.0.10".to_string(),
                hw_address: "aa:bb:cc:dd:ee:02".to_string(),
                subnet_id: Some(2),
                dns_servers: Some("1.1.1.1, 8.8.8.8".to_string()),
                ..crate::ReservationForm::default()
            })
            .await
            .unwrap();

        let document = manager(&source).export_reservations(None).await.unwrap();
        assert_eq!(document.count, 2);
        assert!(chrono::DateTime::parse_from_rfc3339(&document.exported_at).is_ok());

        let body = serde_json::to_value(&document).unwrap();
        assert!(body.get("exported-at").is_some());
        let payload: ImportPayload = serde_json::from_value(body).unwrap();

        let target = mock();
        let summary = manager(&target)
            .import_reservations(&payload.into_records())
            .await
            .unwrap();
        assert_eq!(summary.created, 2);
        assert_eq!(
            target.subnet(2).unwrap().reservations[0].option_data[0].data,
            "1.1.1.1, 8.8.8.8"
        );
    }

    #[tokio::test]
    async fn test_export_single_subnet() {
        let mock = mock();
        let mut subnet = mock.subnet(2).unwrap();
        subnet
            .reservations
            .push(test_reservation("10.0.0.10", "aa:bb:cc:dd:ee:01", None));
        mock.add_subnet(subnet);

        assert_eq!(manager(&mock).export_reservations(Some(1)).await.unwrap().count, 0);
        assert_eq!(manager(&mock).export_reservations(Some(2)).await.unwrap().count, 1);
    }

    #[test]
    fn test_import_payload_shapes() {
        let wrapped: ImportPayload =
            serde_json::from_value(json!({ "reservations": [{ "ip-address": "192.168.1.10" }] }))
                .unwrap();
        assert_eq!(wrapped.into_records().len(), 1);

        let bare: ImportPayload = serde_json::from_value(json!([{}, {}])).unwrap();
        assert_eq!(bare.into_records().len(), 2);
    }
}
