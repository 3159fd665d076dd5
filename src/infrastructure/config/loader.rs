use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::infrastructure::logging::{LogFormat, RotationPolicy};

/// Project config file, created by `init`.
pub const CONFIG_FILE: &str = "padel.yaml";
/// Optional local overrides, never committed.
pub const LOCAL_CONFIG_FILE: &str = "padel.local.yaml";
/// Prefix for environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "PADEL_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid scheduling.{field}: {value}. Must be at least 1")]
    InvalidSchedulingLimit { field: &'static str, value: u32 },

    #[error("Invalid fallback_court_cost_per_hour: {0}. Cannot be negative")]
    NegativeCourtCost(i64),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. padel.yaml (project config, created by init)
    /// 3. padel.local.yaml (local overrides, optional)
    /// 4. Environment variables (PADEL_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment(Yaml::file(CONFIG_FILE))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring local
    /// overrides and environment variables.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Self::figment(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(project: figment::providers::Data<Yaml>) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(project)
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }
        if config.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "server.host cannot be empty".to_string(),
            ));
        }

        // Validate database config
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        // Validate logging config
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        if config.logging.format.parse::<LogFormat>().is_err() {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }
        if config.logging.rotation.parse::<RotationPolicy>().is_err() {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        // Validate scheduling rules
        let scheduling = &config.scheduling;
        for (field, value) in [
            ("default_occurrences", scheduling.default_occurrences),
            ("max_series_length", scheduling.max_series_length),
            ("default_max_students", scheduling.default_max_students),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidSchedulingLimit { field, value });
            }
        }
        if scheduling.default_occurrences > scheduling.max_series_length {
            return Err(ConfigError::ValidationFailed(format!(
                "scheduling.default_occurrences ({}) exceeds max_series_length ({})",
                scheduling.default_occurrences, scheduling.max_series_length
            )));
        }
        if scheduling.fallback_court_cost_per_hour.minor() < 0 {
            return Err(ConfigError::NegativeCourtCost(
                scheduling.fallback_court_cost_per_hour.minor(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, ".padel/padel.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.scheduling.default_occurrences, 12);
        assert_eq!(config.scheduling.fallback_court_cost_per_hour.minor(), 25_000);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
server:
  port: 9000
database:
  path: /custom/path.db
  max_connections: 8
logging:
  level: debug
  format: pretty
scheduling:
  fallback_court_cost_per_hour: 30000
  max_series_length: 52
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.scheduling.fallback_court_cost_per_hour.minor(), 30_000);
        assert_eq!(config.scheduling.max_series_length, 52);
        assert_eq!(config.scheduling.default_max_students, 4);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidPort(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_settings() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "loud"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));

        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogRotation(_))
        ));
    }

    #[test]
    fn test_validate_database() {
        let mut config = Config::default();
        config.database.path = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));

        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_validate_scheduling_limits() {
        let mut config = Config::default();
        config.scheduling.max_series_length = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidSchedulingLimit { field: "max_series_length", .. })
        ));

        let mut config = Config::default();
        config.scheduling.default_max_students = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidSchedulingLimit { field: "default_max_students", .. })
        ));

        let mut config = Config::default();
        config.scheduling.default_occurrences = 200;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_env_override() {
        let file = yaml_file("server:\n  port: 9000\nlogging:\n  level: info");

        temp_env::with_vars(
            [
                ("PADEL_SERVER__PORT", Some("9100")),
                ("PADEL_SCHEDULING__MAX_SERIES_LENGTH", Some("20")),
                ("PADEL_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.server.port, 9100, "Env should beat the file");
                assert_eq!(config.scheduling.max_series_length, 20);
                assert_eq!(config.logging.level, "debug");
            },
        );
    }

    #[test]
    fn test_invalid_env_value_fails_validation() {
        let file = yaml_file("server:\n  port: 9000");

        temp_env::with_var("PADEL_SCHEDULING__DEFAULT_MAX_STUDENTS", Some("0"), || {
            assert!(ConfigLoader::load_from_file(file.path()).is_err());
        });
    }

    #[test]
    fn test_hierarchical_merging() {
        let base_file = yaml_file("server:\n  port: 9000\nlogging:\n  level: info\n  format: json");
        let override_file = yaml_file("server:\n  port: 9001\nlogging:\n  level: debug");

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.server.port, 9001, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }
}
