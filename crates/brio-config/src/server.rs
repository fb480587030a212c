//! Dev server options (`server`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::proxy::{ProxyOptions, ProxyTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Fail instead of trying the next free port.
    #[serde(default)]
    pub strict_port: bool,

    /// Open the browser once the server is listening.
    #[serde(default)]
    pub open: bool,

    #[serde(default = "default_cors")]
    pub cors: bool,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub proxy: IndexMap<String, ProxyOptions>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            strict_port: false,
            open: false,
            cors: default_cors(),
            proxy: IndexMap::new(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedServer {
    pub host: String,
    pub port: u16,
    pub strict_port: bool,
    pub open: bool,
    pub cors: bool,
    pub proxy: ProxyTable,
}

impl ServerOptions {
    pub fn resolve(&self) -> Result<ResolvedServer> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.host".to_string(),
                hint: Some("Use an address such as '127.0.0.1' or 'localhost'".to_string()),
            });
        }

        Ok(ResolvedServer {
            host: self.host.trim().to_string(),
            port: self.port,
            strict_port: self.strict_port,
            open: self.open,
            cors: self.cors,
            proxy: ProxyTable::from_options(&self.proxy)?,
        })
    }
}
