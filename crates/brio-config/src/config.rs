//! High-level configuration structure for Brio.
//!
//! This module provides the `BrioConfig` document, mode-profile merging, and
//! resolution into a [`ResolvedConfig`]. For file discovery, see the
//! `discovery` module.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alias::AliasTable;
use crate::build::BuildOptions;
use crate::css::CssOptions;
use crate::define::DefineTable;
use crate::deps::OptimizeDeps;
use crate::error::{ConfigError, Result as ConfigResult};
use crate::mode::BuildMode;
use crate::plugin::{PluginSpec, active_plugins};
use crate::resolved::{ResolvedConfig, ResolvedResolve};
use crate::server::ServerOptions;
use crate::validation::{ConfigValidator, SchemaValidator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrioConfig {
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,

    #[serde(default)]
    pub resolve: ResolveOptions,

    #[serde(default)]
    pub server: ServerOptions,

    #[serde(default)]
    pub build: BuildOptions,

    #[serde(default)]
    pub optimize_deps: OptimizeDeps,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub define: IndexMap<String, Value>,

    #[serde(default)]
    pub css: CssOptions,

    /// Partial documents keyed by mode name, merged over the base when that
    /// mode is active.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub profiles: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    #[serde(default)]
    pub alias: AliasTable,
}

impl BrioConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use brio_config::BrioConfig;
    /// use serde_json::json;
    ///
    /// let value = json!({
    ///     "server": { "port": 5173 },
    ///     "build": { "minify": true }
    /// });
    ///
    /// let config = BrioConfig::from_value(value).unwrap();
    /// assert_eq!(config.server.port, 5173);
    /// assert!(config.build.minify);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Merge `profiles.<mode>` over the base document.
    ///
    /// Objects merge key-wise; arrays and scalars replace. The profile table
    /// itself is kept so the result can be inspected.
    pub fn materialize_mode(mut self, mode: BuildMode) -> ConfigResult<Self> {
        let Some(overrides) = self.profiles.get(mode.as_str()).cloned() else {
            return Ok(self);
        };

        if overrides.is_null() {
            return Ok(self);
        }

        let Value::Object(ref map) = overrides else {
            return Err(ConfigError::InvalidProfileOverride {
                message: format!("profiles.{} must be a table", mode),
            });
        };

        if map.contains_key("profiles") {
            return Err(ConfigError::InvalidProfileOverride {
                message: format!("profiles.{} cannot declare nested profiles", mode),
            });
        }

        let profiles = std::mem::take(&mut self.profiles);
        let mut base =
            serde_json::to_value(&self).map_err(|err| ConfigError::InvalidProfileOverride {
                message: err.to_string(),
            })?;
        merge_values(&mut base, &overrides);

        let mut merged: BrioConfig =
            serde_json::from_value(base).map_err(|err| ConfigError::InvalidProfileOverride {
                message: err.to_string(),
            })?;
        merged.profiles = profiles;

        tracing::debug!(mode = %mode, "applied mode profile");
        Ok(merged)
    }

    /// Validate the document and decide every mode-conditional value.
    ///
    /// Profiles are not applied here; call [`BrioConfig::materialize_mode`]
    /// first (or load through `ConfigDiscovery::load_for_mode`).
    pub fn resolve(&self, mode: BuildMode, root: &Path) -> ConfigResult<ResolvedConfig> {
        SchemaValidator.validate(self)?;

        let flags = mode.flags();
        let mut warnings = Vec::new();

        let alias = self.resolve.alias.resolve_against(root)?;
        let server = self.server.resolve()?;
        let build = self.build.resolve(&flags, root)?;

        if self.build.has_inert_terser_options() {
            tracing::warn!("build.terserOptions is set but build.minify is false");
            warnings.push(
                "build.terserOptions is configured while build.minify is false; \
                 the compress options will not be applied"
                    .to_string(),
            );
        }

        let (optimize_deps, dep_warnings) = self.optimize_deps.resolve()?;
        warnings.extend(dep_warnings);

        let define = DefineTable::resolve(&self.define, &flags)?;

        Ok(ResolvedConfig {
            mode,
            root: root.to_path_buf(),
            flags,
            plugins: active_plugins(&self.plugins),
            resolve: ResolvedResolve { alias },
            server,
            build,
            optimize_deps,
            define,
            css: self.css.clone(),
            warnings,
        })
    }
}

pub(crate) fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, Value::Object(update_map)) => {
            let mut new_obj = serde_json::Map::with_capacity(update_map.len());
            for (key, value) in update_map {
                new_obj.insert(key.clone(), value.clone());
            }
            *target_slot = Value::Object(new_obj);
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}
