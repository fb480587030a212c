//! Error types for configuration validation and loading.
//!
//! Every variant here is a configuration error: it is detected once while the
//! document is evaluated and is fatal to startup.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors (for CLI use)
    #[error("alias target not found: {token} -> {}", .path.display())]
    AliasTargetNotFound { token: String, path: PathBuf },

    // Config parsing/loading errors
    #[error("config not found")]
    NotFound,

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value for '{field}'{}", .hint.as_deref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid profile override: {message}")]
    InvalidProfileOverride { message: String },

    #[error("unknown build mode '{value}' (expected 'development' or 'production')")]
    UnknownMode { value: String },

    // Structural errors in the document
    #[error("duplicate key '{key}' in {section}")]
    DuplicateKey { section: String, key: String },

    #[error("module '{specifier}' is assigned to both chunk '{first}' and chunk '{second}'")]
    DuplicateChunkMember {
        specifier: String,
        first: String,
        second: String,
    },

    #[error("invalid proxy rule '{prefix}': {message}")]
    InvalidProxyRule { prefix: String, message: String },

    #[error("invalid alias '{token}': {message}")]
    InvalidAlias { token: String, message: String },

    // Schema validation errors (no filesystem checks)
    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
