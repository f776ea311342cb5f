//! Unit tests for configuration loading and saving

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::time::Duration;

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let config = AppConfig::from_yaml(
            "kea:\n  control_agent_url: http://kea:8000\n  persist_config: true\napp:\n  port: 8080\n",
        )
        .unwrap();
        assert_eq!(config.kea.control_agent_url, "http://kea:8000");
        assert!(config.kea.persist_config);
        assert_eq!(config.kea.default_subnet_id, 1);
        assert_eq!(config.kea.timeout_secs, 10);
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.logging.level, "INFO");
    }

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(matches!(
            AppConfig::from_yaml("kea: [unclosed"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(&dir.path().join("absent.yaml")).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = AppConfig::default();
        config.kea.username = "admin".to_string();
        config.kea.password = "secret".to_string();
        config.logging.format = "json".to_string();
        config.save(&path).await.unwrap();

        let loaded = AppConfig::load(&path).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.logging.is_json());
        assert!(!dir.path().join("config.yaml.tmp").exists());
    }

    #[test]
    fn test_sanitized_masks_password_only_when_set() {
        let mut config = AppConfig::default();
        assert_eq!(config.sanitized().kea.password, "");

        config.kea.password = "secret".to_string();
        assert_eq!(config.sanitized().kea.password, MASKED_PASSWORD);
        assert_eq!(config.kea.password, "secret");
    }

    #[test]
    fn test_masked_password_keeps_current() {
        let mut current = AppConfig::default();
        current.kea.password = "secret".to_string();

        let mut incoming = current.sanitized();
        incoming.restore_masked_password(&current);
        assert_eq!(incoming.kea.password, "secret");

        let mut changed = current.sanitized();
        changed.kea.password = "new-secret".to_string();
        changed.restore_masked_password(&current);
        assert_eq!(changed.kea.password, "new-secret");
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let mut bad_url = AppConfig::default();
        bad_url.kea.control_agent_url = "kea:8000".to_string();
        assert!(matches!(bad_url.validate(), Err(ConfigError::Invalid(_))));

        let mut zero_timeout = AppConfig::default();
        zero_timeout.kea.timeout_secs = 0;
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_client_settings() {
        let mut config = AppConfig::default();
        config.kea.timeout_secs = 3;
        config.kea.default_subnet_id = 4;
        assert_eq!(config.client_config().timeout, Duration::from_secs(3));
        assert_eq!(config.manager_options().default_subnet_id, 4);
    }

    #[test]
    fn test_log_directive() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_directive(), "info");
        config.app.debug = true;
        assert_eq!(config.log_directive(), "debug");
    }

    #[test]
    fn test_log_directive_maps_python_level_names() {
        let mut config = AppConfig::default();
        config.logging.level = "WARNING".to_string();
        assert_eq!(config.log_directive(), "warn");
        config.logging.level = "CRITICAL".to_string();
        assert_eq!(config.log_directive(), "error");
        config.logging.level = "Trace".to_string();
        assert_eq!(config.log_directive(), "trace");
    }
}
