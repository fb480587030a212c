//! Build mode and the flags derived from it.
//!
//! The mode is read once at configuration-evaluation time, either from an
//! explicit value (CLI flag) or from `NODE_ENV`. Everything that depends on
//! development vs. production goes through [`BuildMode`] instead of comparing
//! strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Environment variable consulted when no explicit mode is given.
pub const MODE_ENV_VAR: &str = "NODE_ENV";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    /// Resolve the mode from `NODE_ENV`.
    ///
    /// An unset or empty variable means development. Any value other than the
    /// recognised spellings is rejected so a typo cannot silently produce a
    /// development build.
    pub fn from_env() -> Result<Self> {
        match std::env::var(MODE_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::Development),
        }
    }

    /// Explicit mode wins over the environment.
    pub fn resolve(explicit: Option<BuildMode>) -> Result<Self> {
        match explicit {
            Some(mode) => Ok(mode),
            None => Self::from_env(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }

    pub fn flags(self) -> BuildModeFlags {
        BuildModeFlags::for_mode(self)
    }
}

impl FromStr for BuildMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::UnknownMode {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode-derived defaults. Explicit values in the document may still override
/// `sourcemap` and the compress options; `dev`/`prod` always follow the mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildModeFlags {
    pub sourcemap: bool,
    pub drop_console: bool,
    pub drop_debugger: bool,
    pub pure_funcs: Vec<String>,
    pub dev: bool,
    pub prod: bool,
}

impl BuildModeFlags {
    pub fn for_mode(mode: BuildMode) -> Self {
        let prod = mode.is_production();
        Self {
            sourcemap: !prod,
            drop_console: prod,
            drop_debugger: prod,
            pure_funcs: if prod {
                vec!["console.log".to_string()]
            } else {
                Vec::new()
            },
            dev: !prod,
            prod,
        }
    }
}
