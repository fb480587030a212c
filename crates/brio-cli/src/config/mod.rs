//! Project loading with layered overrides.
//!
//! The document is read once by `brio-config`, the mode profile is applied,
//! and the scalar server and build settings are then layered.
//! Priority: CLI > Environment (`BRIO_SERVER__PORT=4000`) > File > Defaults

use std::path::{Path, PathBuf};
use std::sync::Arc;

use brio_config::{BrioConfig, BuildMode, ConfigDiscovery, ConfigError, ResolvedConfig};
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::cli::{DevArgs, ProjectArgs};
use crate::error::{CliError, Result};

/// Environment variable prefix for overrides. Nested keys use `__`.
pub const ENV_PREFIX: &str = "BRIO_";

/// Settings that environment variables and flags may override.
///
/// Only scalars are layered. Ordered tables (`server.proxy`,
/// `resolve.alias`) always come from the document as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeredSettings {
    pub server: ServerSettings,
    pub build: BuildSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub strict_port: bool,
    pub open: bool,
    pub cors: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    pub out_dir: PathBuf,
    pub minify: bool,
}

impl LayeredSettings {
    fn from_config(config: &BrioConfig) -> Self {
        Self {
            server: ServerSettings {
                host: config.server.host.clone(),
                port: config.server.port,
                strict_port: config.server.strict_port,
                open: config.server.open,
                cors: config.server.cors,
            },
            build: BuildSettings {
                out_dir: config.build.out_dir.clone(),
                minify: config.build.minify,
            },
        }
    }

    fn apply(self, config: &mut BrioConfig) {
        config.server.host = self.server.host;
        config.server.port = self.server.port;
        config.server.strict_port = self.server.strict_port;
        config.server.open = self.server.open;
        config.server.cors = self.server.cors;
        config.build.out_dir = self.build.out_dir;
        config.build.minify = self.build.minify;
    }
}

/// Flags given on the command line. Unset flags do not override anything.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    server: ServerOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
struct ServerOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strict_port: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open: Option<bool>,
}

impl CliOverrides {
    pub fn from_dev_args(args: &DevArgs) -> Self {
        Self {
            server: ServerOverrides {
                host: args.host.clone(),
                port: args.port,
                strict_port: args.strict_port.then_some(true),
                open: args.open.then_some(true),
            },
        }
    }
}

/// A loaded, validated project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub root: PathBuf,
    /// Config file the document came from, if any.
    pub source: Option<PathBuf>,
    pub mode: BuildMode,
    /// Document after the mode profile and overrides were applied.
    pub config: BrioConfig,
    pub resolved: Arc<ResolvedConfig>,
}

/// Load and resolve the project described by `args`.
///
/// Every configuration error surfaces here, before any port is bound.
pub fn load_project(args: &ProjectArgs, overrides: &CliOverrides) -> Result<LoadedProject> {
    let root = project_root(args.cwd.as_deref())?;
    let mode = BuildMode::resolve(args.mode.map(Into::into))?;
    let discovery = ConfigDiscovery::new(&root);

    let source = match &args.config {
        Some(path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                root.join(path)
            };
            if !path.exists() {
                return Err(CliError::FileNotFound(path));
            }
            Some(path)
        }
        None => discovery.find(),
    };

    let document = match &source {
        Some(path) => discovery.load_from(path)?,
        None => discovery.load_or_default()?,
    };

    let mut config = document.materialize_mode(mode)?;
    layer(&config, overrides)?.apply(&mut config);

    let resolved = config.resolve(mode, &root)?;

    tracing::debug!(
        mode = %mode,
        source = ?source,
        rules = resolved.server.proxy.len(),
        "project loaded"
    );

    Ok(LoadedProject {
        root,
        source,
        mode,
        config,
        resolved: Arc::new(resolved),
    })
}

fn layer(config: &BrioConfig, overrides: &CliOverrides) -> Result<LayeredSettings> {
    Figment::new()
        .merge(Serialized::defaults(LayeredSettings::from_config(config)))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Serialized::defaults(overrides))
        .extract()
        .map_err(|e| {
            ConfigError::InvalidValue {
                field: "environment".to_string(),
                hint: Some(format!(
                    "{}. Check {}* variables, e.g. {}SERVER__PORT=4000",
                    e, ENV_PREFIX, ENV_PREFIX
                )),
            }
            .into()
        })
}

fn project_root(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let root = match cwd {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current.join(dir),
        None => current,
    };
    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "project root {} is not a directory",
            root.display()
        )));
    }
    Ok(path_clean::clean(root))
}
