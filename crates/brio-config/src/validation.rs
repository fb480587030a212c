//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use std::path::Path;

use crate::config::BrioConfig;
use crate::define::validate_user_defines;
use crate::error::{ConfigError, Result};
use crate::mode::BuildMode;
use crate::plugin::validate_plugins;
use crate::proxy::ProxyTable;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &BrioConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use brio_config::{BrioConfig, SchemaValidator, ConfigValidator};
///
/// let config = BrioConfig::default();
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &BrioConfig) -> Result<()> {
        validate_plugins(&config.plugins)?;
        config.resolve.alias.validate()?;

        if config.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.host".to_string(),
                hint: Some("Use an address such as '127.0.0.1' or 'localhost'".to_string()),
            });
        }
        ProxyTable::from_options(&config.server.proxy)?;

        config.build.validate()?;
        config.optimize_deps.validate()?;
        validate_user_defines(&config.define)?;

        for name in config.profiles.keys() {
            if name != BuildMode::Development.as_str() && name != BuildMode::Production.as_str() {
                return Err(ConfigError::InvalidProfileOverride {
                    message: format!(
                        "unknown profile '{}' (expected 'development' or 'production')",
                        name
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then requires every alias target to exist on disk.
///
/// # Example
///
/// ```no_run
/// use brio_config::{BrioConfig, FsValidator, ConfigValidator};
///
/// let config = BrioConfig::default();
/// FsValidator::new("/path/to/project").validate(&config).unwrap();
/// ```
pub struct FsValidator {
    root: std::path::PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &BrioConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        let aliases = config.resolve.alias.resolve_against(&self.root)?;
        for (token, path) in aliases.iter() {
            if !path.exists() {
                return Err(ConfigError::AliasTargetNotFound {
                    token: token.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &BrioConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &BrioConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}
