//! File-based config discovery for CLI use
//!
//! Handles finding and loading Brio configuration files from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::BrioConfig;
use crate::error::{ConfigError, Result};
use crate::mode::BuildMode;
use crate::resolved::ResolvedConfig;
use crate::strict::reject_duplicate_keys;

/// Dedicated config file name.
pub const CONFIG_FILE: &str = "brio.toml";

/// Field read from `package.json` when no dedicated file exists.
pub const PACKAGE_JSON_FIELD: &str = "brio";

/// File-based configuration discovery
///
/// Searches for Brio configuration in conventional locations and loads it.
/// This is primarily for CLI use - library users should use `BrioConfig::from_value()` directly.
///
/// # Example
///
/// ```no_run
/// use brio_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: brio.toml
    /// 2. package.json (brio field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|v| !v.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<BrioConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load config, or defaults when the project has none.
    pub fn load_or_default(&self) -> Result<BrioConfig> {
        match self.load() {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound) => {
                tracing::debug!(root = %self.root.display(), "no brio config found, using defaults");
                Ok(BrioConfig::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Load config with the mode profile applied
    pub fn load_for_mode(&self, mode: BuildMode) -> Result<BrioConfig> {
        self.load()?.materialize_mode(mode)
    }

    /// Load, apply the mode profile, and resolve against the discovery root.
    pub fn resolve(&self, mode: BuildMode) -> Result<ResolvedConfig> {
        self.load_for_mode(mode)?.resolve(mode, &self.root)
    }

    /// Load config from a specific file path
    pub fn load_from(&self, path: &Path) -> Result<BrioConfig> {
        if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            return self.load_from_package_json(path);
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {}
            Some("json") => return self.load_from_json(path),
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        }

        let content = fs::read_to_string(path)?;

        let toml_val: toml::Value =
            toml::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                field: "toml".to_string(),
                hint: Some(format!("Invalid TOML syntax: {}", e)),
            })?;

        let value = serde_json::to_value(toml_val).map_err(|e| ConfigError::InvalidValue {
            field: "toml".to_string(),
            hint: Some(format!("TOML to JSON conversion failed: {}", e)),
        })?;

        tracing::debug!(path = %path.display(), "loaded config");
        BrioConfig::from_value(value)
    }

    fn load_from_json(&self, path: &Path) -> Result<BrioConfig> {
        let content = fs::read_to_string(path)?;
        reject_duplicate_keys(&content, "")?;

        let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
            field: "json".to_string(),
            hint: Some(format!("Invalid JSON: {}", e)),
        })?;

        BrioConfig::from_value(value)
    }

    fn load_from_package_json(&self, path: &Path) -> Result<BrioConfig> {
        let content = fs::read_to_string(path)?;
        reject_duplicate_keys(&content, PACKAGE_JSON_FIELD)?;

        let parsed: Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                field: "package.json".to_string(),
                hint: Some(format!("Invalid JSON: {}", e)),
            })?;

        let brio_value = parsed
            .get(PACKAGE_JSON_FIELD)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: PACKAGE_JSON_FIELD.to_string(),
                hint: Some("Add a 'brio' field to your package.json".to_string()),
            })?;

        if brio_value.is_null() {
            return Err(ConfigError::InvalidValue {
                field: PACKAGE_JSON_FIELD.to_string(),
                hint: Some("The 'brio' field cannot be null".to_string()),
            });
        }

        tracing::debug!(path = %path.display(), "loaded config from package.json");
        BrioConfig::from_value(brio_value.clone())
    }
}
