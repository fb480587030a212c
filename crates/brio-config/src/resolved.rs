//! The immutable, fully resolved configuration.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::alias::AliasTable;
use crate::build::ResolvedBuild;
use crate::css::CssOptions;
use crate::define::DefineTable;
use crate::deps::OptimizeDeps;
use crate::error::{ConfigError, Result};
use crate::mode::{BuildMode, BuildModeFlags};
use crate::plugin::PluginSpec;
use crate::server::ResolvedServer;

/// Built once by [`BrioConfig::resolve`](crate::BrioConfig::resolve) and shared
/// by reference afterwards. Serializes to the JSON document handed to the
/// bundler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub mode: BuildMode,
    pub root: PathBuf,
    pub flags: BuildModeFlags,
    pub plugins: Vec<PluginSpec>,
    pub resolve: ResolvedResolve,
    pub server: ResolvedServer,
    pub build: ResolvedBuild,
    pub optimize_deps: OptimizeDeps,
    pub define: DefineTable,
    pub css: CssOptions,
    #[serde(skip)]
    pub(crate) warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedResolve {
    pub alias: AliasTable,
}

impl ResolvedConfig {
    /// Non-fatal findings collected during resolution.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        rendered.map_err(|e| ConfigError::InvalidValue {
            field: "resolved".to_string(),
            hint: Some(e.to_string()),
        })
    }
}
