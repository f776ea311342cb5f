//! Unit tests for reservation translation

#[cfg(test)]
mod tests {
    use crate::translate::*;
    use crate::validate::ValidationError;
    use kea_client::{HostReservation, OptionData, OPTION_DOMAIN_NAME_SERVERS, OPTION_ROUTERS};
    use serde_json::json;

    fn form(dns: Option<&str>) -> ReservationForm {
        ReservationForm {
            ip_address: "192.168.1.10".to_string(),
            hw_address: "AA:BB:CC:DD:EE:FF".to_string(),
            hostname: Some("printer".to_string()),
            subnet_id: Some(1),
            dns_servers: dns.map(str::to_string),
        }
    }

    #[test]
    fn test_to_kea_adds_domain_name_servers_option() {
        let reservation = to_kea(&form(Some("8.8.8.8,1.1.1.1")), 1).unwrap();
        assert_eq!(reservation.hw_address.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(reservation.subnet_id, Some(1));
        assert_eq!(
            reservation.option_data,
            vec![OptionData::named(OPTION_DOMAIN_NAME_SERVERS, "8.8.8.8, 1.1.1.1")]
        );
        assert_eq!(
            serde_json::to_value(&reservation).unwrap()["option-data"],
            json!([{ "name": "domain-name-servers", "data": "8.8.8.8, 1.1.1.1" }])
        );
    }

    #[test]
    fn test_to_kea_omits_option_data_without_dns() {
        for dns in [None, Some(""), Some("  ")] {
            let reservation = to_kea(&form(dns), 1).unwrap();
            assert!(reservation.option_data.is_empty());
            assert!(serde_json::to_value(&reservation)
                .unwrap()
                .get("option-data")
                .is_none());
        }
    }

    #[test]
    fn test_to_kea_rejects_bad_dns_token() {
        assert_eq!(
            to_kea(&form(Some("8.8.8.8, 300.1.1.1")), 1),
            Err(ValidationError::InvalidDnsServer("300.1.1.1".to_string()))
        );
        assert!(matches!(
            to_kea(&form(Some("8.8.8.8,")), 1),
            Err(ValidationError::EmptyDnsServer(_))
        ));
    }

    #[test]
    fn test_to_kea_requires_ip_and_mac() {
        let mut missing_mac = form(None);
        missing_mac.hw_address.clear();
        assert_eq!(
            to_kea(&missing_mac, 1),
            Err(ValidationError::MissingField("hw-address"))
        );
    }

    #[test]
    fn test_to_kea_uses_default_subnet() {
        let mut without_subnet = form(None);
        without_subnet.subnet_id = None;
        assert_eq!(to_kea(&without_subnet, 7).unwrap().subnet_id, Some(7));
    }

    #[test]
    fn test_dns_round_trip() {
        for dns in ["8.8.8.8", "8.8.8.8, 1.1.1.1", "1.1.1.1,1.0.0.1, 9.9.9.9,8.8.4.4"] {
            let reservation = to_kea(&form(Some(dns)), 1).unwrap();
            let back = from_kea(&reservation, 1).unwrap();
            let stored = reservation.option_data[0].data.clone();
            assert_eq!(back.dns_servers.as_deref(), Some(stored.as_str()));

            // A second pass is stable
            let again = to_kea(&back, 1).unwrap();
            assert_eq!(again.option_data[0].data, stored);
        }
    }

    #[test]
    fn test_from_kea_skips_reservations_without_mac() {
        let by_client_id: HostReservation = serde_json::from_value(json!({
            "client-id": "01:aa:bb:cc:dd:ee:ff",
            "ip-address": "192.168.1.20"
        }))
        .unwrap();
        assert!(from_kea(&by_client_id, 1).is_none());
    }

    #[test]
    fn test_form_accepts_snake_case_and_string_subnet() {
        let parsed: ReservationForm = serde_json::from_value(json!({
            "ip_address": "192.168.1.10",
            "hw_address": "aa:bb:cc:dd:ee:ff",
            "subnet_id": "3",
            "dns_servers": "8.8.8.8"
        }))
        .unwrap();
        assert_eq!(parsed.subnet_id, Some(3));
        assert_eq!(parsed.dns_servers.as_deref(), Some("8.8.8.8"));

        let blank: ReservationForm =
            serde_json::from_value(json!({ "ip-address": "192.168.1.10", "subnet-id": "" })).unwrap();
        assert_eq!(blank.subnet_id, None);

        assert!(serde_json::from_value::<ReservationForm>(json!({ "subnet_id": "x" })).is_err());
    }

    #[test]
    fn test_option_helpers() {
        let mut options = vec![OptionData::named(OPTION_ROUTERS, "192.168.1.1")];
        set_option(&mut options, OPTION_ROUTERS, "192.168.1.254");
        set_option(&mut options, OPTION_DOMAIN_NAME_SERVERS, "8.8.8.8");
        assert_eq!(options.len(), 2);
        assert_eq!(option_value(&options, OPTION_ROUTERS), Some("192.168.1.254"));

        assert!(remove_option(&mut options, OPTION_ROUTERS));
        assert!(!remove_option(&mut options, OPTION_ROUTERS));
        assert_eq!(dns_servers_from_options(&options).as_deref(), Some("8.8.8.8"));
    }
}
