//! Endpoint tests against an in-memory Control Agent

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::metrics::Metrics;
    use crate::routes::build_router;
    use crate::state::AppState;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use dhcp_manager::DhcpManager;
    use kea_client::mock::{test_lease, test_subnet};
    use kea_client::MockKeaClient;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        state: AppState,
        mock: MockKeaClient,
        _dir: TempDir,
    }

    fn test_app(mock: MockKeaClient) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default();
        let manager = DhcpManager::new(Arc::new(mock.clone()), config.manager_options());
        let state = AppState::new(
            config,
            dir.path().join("config.yaml"),
            manager,
            Metrics::new().unwrap(),
        );
        TestApp {
            router: build_router(state.clone()),
            state,
            mock,
            _dir: dir,
        }
    }

    fn kea() -> MockKeaClient {
        let mock = MockKeaClient::new("http://kea-test:8000");
        mock.add_subnet(test_subnet(1, "192.168.1.0/24", "192.168.1.100 - 192.168.1.200"));
        mock.add_lease(test_lease("192.168.1.150", "aa:bb:cc:dd:ee:01", 1));
        mock
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let app = test_app(kea());
        let (status, body) = send(&app.router, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["kea_connection"], "ok");
        assert_eq!(body["version"], "2.4.1");
    }

    #[tokio::test]
    async fn test_leases_endpoint() {
        let app = test_app(kea());
        let (status, body) = send(&app.router, Method::GET, "/api/leases?subnet_id=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 1);
        assert_eq!(body["leases"][0]["ip-address"], "192.168.1.150");

        let (status, body) = send(&app.router, Method::GET, "/api/leases?subnet_id=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);

        let (status, body) = send(&app.router, Method::GET, "/api/reservations?subnet_id=%20", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);

        let (status, body) = send(&app.router, Method::GET, "/api/leases?subnet_id=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_leases_without_hook_is_not_implemented() {
        let app = test_app(kea().without_lease_cmds());
        let (status, body) = send(&app.router, Method::GET, "/api/leases", None).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert!(body["error"].as_str().unwrap().contains("libdhcp_lease_cmds.so"));
    }

    #[tokio::test]
    async fn test_promote_and_list_reservations() {
        let app = test_app(kea().without_host_cmds());
        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/promote",
            Some(json!({
                "ip_address": "192.168.1.150",
                "hw_address": "AA:BB:CC:DD:EE:01",
                "hostname": "printer",
                "dns_servers": "8.8.8.8,1.1.1.1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["method"], "config-set");
        assert_eq!(body["reservation"]["hw-address"], "aa:bb:cc:dd:ee:01");

        let (_, body) = send(&app.router, Method::GET, "/api/reservations", None).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["reservations"][0]["dns-servers"], "8.8.8.8, 1.1.1.1");

        let metrics = app.state.metrics().gather().unwrap();
        assert!(metrics.contains("kea_console_reservation_writes_total{method=\"config-set\"} 1"));
    }

    #[tokio::test]
    async fn test_promote_validation_error_is_bad_request() {
        let app = test_app(kea());
        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/reservations",
            Some(json!({
                "ip-address": "192.168.1.150",
                "hw-address": "aa:bb:cc:dd:ee:01",
                "dns-servers": "8.8.8.8,"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(app.mock.commands().is_empty());

        let (status, _) = send(&app.router, Method::POST, "/api/promote", Some(json!([1, 2]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_out_of_subnet_is_bad_request() {
        let app = test_app(kea().without_host_cmds());
        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/promote",
            Some(json!({ "ip_address": "10.9.9.9", "hw_address": "aa:bb:cc:dd:ee:01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_reservation() {
        let app = test_app(kea());
        send(
            &app.router,
            Method::POST,
            "/api/promote",
            Some(json!({ "ip_address": "192.168.1.150", "hw_address": "aa:bb:cc:dd:ee:01" })),
        )
        .await;

        let (status, body) = send(
            &app.router,
            Method::DELETE,
            "/api/reservation/192.168.1.150?subnet_id=1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "host-cmds");

        let (status, _) = send(
            &app.router,
            Method::DELETE,
            "/api/reservation/192.168.1.150?subnet_id=1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_subnet_endpoints() {
        let app = test_app(kea());
        let (status, body) = send(&app.router, Method::GET, "/api/subnets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subnets"][0]["subnet"], "192.168.1.0/24");

        let (status, _) = send(&app.router, Method::GET, "/api/subnets/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app.router,
            Method::PUT,
            "/api/subnets/1",
            Some(json!({ "routers": "192.168.1.1", "valid-lifetime": 7200 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subnet"]["valid-lifetime"], 7200);
        assert_eq!(body["subnet"]["option-data"][0]["data"], "192.168.1.1");

        let (status, _) = send(
            &app.router,
            Method::PUT,
            "/api/subnets/1",
            Some(json!({ "renew-timer": 9000 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_then_import() {
        let app = test_app(kea());
        send(
            &app.router,
            Method::POST,
            "/api/promote",
            Some(json!({ "ip_address": "192.168.1.150", "hw_address": "aa:bb:cc:dd:ee:01" })),
        )
        .await;

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/reservations/export")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(document["count"], 1);

        let target = test_app(kea());
        let (status, body) = send(
            &target.router,
            Method::POST,
            "/api/reservations/import",
            Some(document),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["created"], 1);
        assert_eq!(body["failed"], 0);
        assert!(body.get("methods").is_none());
        let metrics = target.state.metrics().gather().unwrap();
        assert!(metrics.contains("kea_console_reservation_writes_total{method=\"host-cmds\"} 1"));

        let (_, body) = send(
            &target.router,
            Method::POST,
            "/api/reservations/import",
            Some(json!([{ "ip-address": "192.168.1.150", "hw-address": "aa:bb:cc:dd:ee:01" }])),
        )
        .await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["failed"], 1);
    }

    #[tokio::test]
    async fn test_commands_endpoint() {
        let app = test_app(kea().without_host_cmds());
        let (status, body) = send(&app.router, Method::GET, "/api/commands", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["host_cmds"], false);
        assert_eq!(body["lease_cmds"], true);
    }

    #[tokio::test]
    async fn test_config_round_trip() {
        let app = test_app(kea());
        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/config",
            Some(json!({
                "config": {
                    "kea": { "control_agent_url": "http://kea-new:8000", "username": "admin", "password": "secret" },
                    "app": { "port": 5050 }
                }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(app.state.manager().await.url(), "http://kea-new:8000");

        let (_, body) = send(&app.router, Method::GET, "/api/config", None).await;
        assert_eq!(body["config_exists"], true);
        assert_eq!(body["config"]["kea"]["password"], "***");
        assert_eq!(body["config"]["app"]["port"], 5050);

        // Sending the masked value back keeps the stored password
        let mut masked = body["config"].clone();
        masked["app"]["port"] = json!(5051);
        let (status, _) = send(&app.router, Method::POST, "/api/config", Some(json!({ "config": masked }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.state.config().await.kea.password, "secret");
    }

    #[tokio::test]
    async fn test_config_requires_sections() {
        let app = test_app(kea());
        let (status, body) = send(&app.router, Method::POST, "/api/config", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Configuration object is required");

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/config",
            Some(json!({ "config": { "kea": {} } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = test_app(kea());
        send(&app.router, Method::GET, "/api/subnets", None).await;

        let response = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains(
            "kea_console_operations_total{operation=\"list_subnets\",outcome=\"success\"} 1"
        ));
    }
}
