//! Error handling for the Brio CLI.
//!
//! This module provides a hierarchical error type system using `thiserror` for
//! structured error handling. Each error variant is designed to be actionable.
//!
//! # Architecture
//!
//! - **Top-level errors** (`CliError`) represent broad categories of failures
//! - **Domain-specific errors** (`brio_config::ConfigError`, `ProxyError`) provide detailed context
//! - **Error conversion** is automatic via `#[from]` attributes
//!
//! # Example
//!
//! ```rust,no_run
//! use brio_cli::error::{CliError, Result};
//! use std::path::Path;
//!
//! fn require_dir(path: &Path) -> Result<()> {
//!     if !path.is_dir() {
//!         return Err(CliError::FileNotFound(path.to_path_buf()));
//!     }
//!     Ok(())
//! }
//! ```

mod miette;

use std::path::PathBuf;
use thiserror::Error;

pub use self::miette::cli_error_to_miette;
pub use crate::proxy::ProxyError;
pub use brio_config::ConfigError;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration errors: detected once at startup and always fatal
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Proxy setup errors (upstream client construction)
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Development server errors
    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;
