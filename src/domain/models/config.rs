use serde::{Deserialize, Serialize};

use super::money::Money;
use super::recurrence::DEFAULT_OCCURRENCES;

/// Main configuration structure for the scheduler service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scheduling rules and fallbacks
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to allow cross-origin requests
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".padel/padel.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Scheduling rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulingConfig {
    /// Court cost per hour (minor units) for clubs without their own rate
    #[serde(default = "default_fallback_court_cost")]
    pub fallback_court_cost_per_hour: Money,

    /// Occurrences generated when a pattern has no end date or count
    #[serde(default = "default_occurrences")]
    pub default_occurrences: u32,

    /// Longest series a single request may expand to
    #[serde(default = "default_max_series_length")]
    pub max_series_length: u32,

    /// Capacity used when a class request omits `maxStudents`
    #[serde(default = "default_max_students")]
    pub default_max_students: u32,
}

const fn default_fallback_court_cost() -> Money {
    Money::from_minor(25_000)
}

const fn default_occurrences() -> u32 {
    DEFAULT_OCCURRENCES
}

const fn default_max_series_length() -> u32 {
    104
}

const fn default_max_students() -> u32 {
    4
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            fallback_court_cost_per_hour: default_fallback_court_cost(),
            default_occurrences: default_occurrences(),
            max_series_length: default_max_series_length(),
            default_max_students: default_max_students(),
        }
    }
}
