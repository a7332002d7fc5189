//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * token ttl / realm invariants
//!   * server port and metrics path
//!   * logging level
//!   * user names and scopes

use std::collections::HashMap;

use tracing::{error, info};

use crate::config::service::ServiceConfig;
use crate::config::settings::{LoggingConfig, MetricsConfig, ServerConfig, SettingsConfig, TokenConfig};
use crate::config::users::UserConfig;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::MAX_TOKEN_TTL_SECONDS;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_users(&cfg.users, &mut errors);

    if errors.is_empty() {
        info!("config is valid: {} user(s) registered", cfg.users.len());
        Ok(())
    } else {
        let metrics = get_metrics().await;
        for e in &errors {
            error!("config validation: {}", e);
            metrics.config_validation_errors.inc();
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    validate_server(&settings.server, errors);
    validate_metrics(&settings.metrics, errors);
    validate_token(&settings.token, errors);
    if let Some(logging) = &settings.logging {
        validate_logging(logging, errors);
    }
}

fn validate_server(server: &ServerConfig, errors: &mut Vec<String>) {
    if server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' is not a valid port number",
            server.port
        ));
    }
}

fn validate_metrics(metrics: &MetricsConfig, errors: &mut Vec<String>) {
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }
}

fn validate_token(token: &TokenConfig, errors: &mut Vec<String>) {
    if token.ttl_seconds == 0 {
        errors.push("settings.token.ttl_seconds must be greater than 0".to_string());
    }
    if token.ttl_seconds > MAX_TOKEN_TTL_SECONDS {
        errors.push(format!(
            "settings.token.ttl_seconds {} must not exceed {}",
            token.ttl_seconds, MAX_TOKEN_TTL_SECONDS
        ));
    }
    if token.realm.contains('"') {
        errors.push("settings.token.realm must not contain '\"'".to_string());
    }
    // the realm is sent verbatim in a header value
    if token.realm.chars().any(char::is_control) {
        errors.push("settings.token.realm must not contain control characters".to_string());
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "settings.logging.level '{}' must be one of {}",
            logging.level,
            LOG_LEVELS.join(", ")
        ));
    }
}

fn validate_users(users: &HashMap<String, UserConfig>, errors: &mut Vec<String>) {
    if users.is_empty() {
        errors.push("config: 'users' is empty; at least one user required".to_string());
    }

    for (username, user) in users {
        if username.is_empty() {
            errors.push("users: user name must not be empty".to_string());
        }
        // a colon would be ambiguous inside `Basic base64(user:password)`
        if username.contains(':') {
            errors.push(format!("users['{}']: user name must not contain ':'", username));
        }
        for scope in &user.scopes {
            if scope.is_empty() || scope.chars().any(char::is_whitespace) {
                errors.push(format!(
                    "users['{}'].scopes: '{}' must be non-empty and contain no whitespace",
                    username, scope
                ));
            }
        }
    }
}
