use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// One entry of the ordered plugin activation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Opaque options passed through to the plugin.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

fn default_enabled() -> bool {
    true
}

impl PluginSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            options: Value::Null,
        }
    }
}

pub fn validate_plugins(plugins: &[PluginSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for plugin in plugins {
        if plugin.name.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "plugin name cannot be empty".to_string(),
                hint: Some("Specify a name for each plugin".to_string()),
            });
        }
        if !seen.insert(plugin.name.as_str()) {
            return Err(ConfigError::DuplicateKey {
                section: "plugins".to_string(),
                key: plugin.name.clone(),
            });
        }
    }
    Ok(())
}

/// Enabled plugins in declaration order.
pub fn active_plugins(plugins: &[PluginSpec]) -> Vec<PluginSpec> {
    plugins.iter().filter(|p| p.enabled).cloned().collect()
}
