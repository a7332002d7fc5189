use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_CLEANUP_INTERVAL_SECONDS, DEFAULT_HOST, DEFAULT_METRICS_PATH, DEFAULT_PORT,
    DEFAULT_REALM, DEFAULT_TOKEN_TTL_SECONDS,
};

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub token: TokenConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// kept as a string so `${PORT:3000}` can be expanded before parsing
    #[serde(default = "default_port")]
    pub port: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            is_enabled: false,
        }
    }
}

/// ================================
/// Token issuing
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    /// invariant: > 0
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// mint a refresh token value next to every access token
    #[serde(default)]
    pub issue_refresh_token: bool,
    /// 0 disables the expired token sweep
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
    /// realm advertised in `WWW-Authenticate: Basic realm="..."`
    #[serde(default = "default_realm")]
    pub realm: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            issue_refresh_token: false,
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            realm: default_realm(),
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_metrics_path() -> String {
    DEFAULT_METRICS_PATH.to_string()
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_TOKEN_TTL_SECONDS
}

fn default_cleanup_interval_seconds() -> u64 {
    DEFAULT_CLEANUP_INTERVAL_SECONDS
}

fn default_realm() -> String {
    DEFAULT_REALM.to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
