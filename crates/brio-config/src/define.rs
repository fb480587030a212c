//! Compile-time constant injection (`define`).

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::mode::BuildModeFlags;

/// Keys that always follow the build mode and cannot be set in the document.
pub const RESERVED_DEFINES: [&str; 2] = ["__DEV__", "__PROD__"];

/// Resolved constants, reserved mode flags first, then user entries in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DefineTable {
    entries: IndexMap<String, Value>,
}

impl DefineTable {
    pub fn resolve(user: &IndexMap<String, Value>, flags: &BuildModeFlags) -> Result<Self> {
        validate_user_defines(user)?;

        let mut entries = IndexMap::with_capacity(user.len() + RESERVED_DEFINES.len());
        entries.insert("__DEV__".to_string(), Value::Bool(flags.dev));
        entries.insert("__PROD__".to_string(), Value::Bool(flags.prod));
        for (key, value) in user {
            entries.insert(key.clone(), value.clone());
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Source text substituted for `key`.
    ///
    /// String values are taken as expressions verbatim; everything else is
    /// rendered as its JSON literal.
    pub fn replacement(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(render)
    }

    pub fn replacements(&self) -> impl Iterator<Item = (&str, String)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), render(v)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(expr) => expr.clone(),
        other => other.to_string(),
    }
}

pub fn validate_user_defines(user: &IndexMap<String, Value>) -> Result<()> {
    for key in user.keys() {
        if RESERVED_DEFINES.contains(&key.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: format!("define.{}", key),
                hint: Some(format!("{} is derived from the build mode and cannot be set", key)),
            });
        }
        if key.trim().is_empty() || key.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                field: format!("define.{}", key),
                hint: Some("define keys must be identifiers or dotted member paths".to_string()),
            });
        }
    }
    Ok(())
}
