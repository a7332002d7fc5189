use serde::Deserialize;
use std::collections::HashMap;

use crate::config::settings::SettingsConfig;
use crate::config::users::{default_users, UserConfig};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default = "default_users")]
    pub users: HashMap<String, UserConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            settings: SettingsConfig::default(),
            users: default_users(),
        }
    }
}
