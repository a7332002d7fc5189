use serde::Deserialize;
use std::collections::HashMap;

/// ================================
/// Users
/// ================================
///
/// Passwords are kept in plaintext: the registry is a fixed demo configuration,
/// not a credential store.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UserConfig {
    pub password: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl UserConfig {
    pub fn new(password: &str, scopes: &[&str]) -> Self {
        Self {
            password: password.to_owned(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Users served when the config file has no `users` section.
pub fn default_users() -> HashMap<String, UserConfig> {
    HashMap::from([
        ("alice".to_string(), UserConfig::new("123456", &["read", "write"])),
        ("bob".to_string(), UserConfig::new("abcdef", &["read", "write", "admin"])),
    ])
}
