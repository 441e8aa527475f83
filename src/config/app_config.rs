use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::user::EmailPolicyKind;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub validation: ValidationConfig,
    pub testing: TestingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Snapshot file handling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot preloaded at startup and written on shutdown
    pub data_file: PathBuf,
    pub preload: bool,
    pub export_on_shutdown: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ValidationConfig {
    pub email_policy: EmailPolicyKind,
}

/// Test-support endpoints, off unless explicitly enabled
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TestingConfig {
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/users.json"),
            preload: true,
            export_on_shutdown: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage.data_file, PathBuf::from("data/users.json"));
        assert!(config.storage.preload);
        assert!(!config.storage.export_on_shutdown);
        assert_eq!(config.validation.email_policy, EmailPolicyKind::Strict);
        assert!(!config.testing.enabled);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": {"port": 9090},
            "validation": {"email_policy": "permissive"},
            "testing": {"enabled": true}
        }))
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.validation.email_policy, EmailPolicyKind::Permissive);
        assert!(config.testing.enabled);
        assert!(matches!(config.logging.format, LogFormat::Pretty));
    }
}
