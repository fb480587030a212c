pub mod alias;
pub mod build;
pub mod chunks;
pub mod config;
pub mod css;
pub mod define;
pub mod deps;
pub mod discovery;
pub mod error;
pub mod mode;
pub mod plugin;
pub mod proxy;
pub mod resolved;
pub mod server;
pub mod strict;
pub mod validation;

// Re-export main types
pub use alias::AliasTable;
pub use build::*;
pub use chunks::ManualChunks;
pub use config::*;
pub use css::*;
pub use define::{DefineTable, RESERVED_DEFINES};
pub use deps::OptimizeDeps;
pub use error::*;
pub use mode::{BuildMode, BuildModeFlags, MODE_ENV_VAR};
pub use plugin::PluginSpec;
pub use proxy::{ProxyEvent, ProxyOptions, ProxyRule, ProxyTable};
pub use resolved::{ResolvedConfig, ResolvedResolve};
pub use server::{ResolvedServer, ServerOptions};

// Re-export discovery and validation
pub use discovery::ConfigDiscovery;
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
