//! Brio CLI - frontend dev server and build configuration resolver.
//!
//! # Architecture
//!
//! - [`cli`] - Argument definitions (clap derive)
//! - [`config`] - Project loading with CLI/environment/file layering
//! - [`proxy`] - The dev proxy engine and its lifecycle observers
//! - [`dev`] - The axum development server
//! - [`error`] - Error types and miette conversion
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Terminal status lines
//!
//! Configuration is resolved once per process by `brio-config`; the
//! resulting [`brio_config::ResolvedConfig`] is shared by reference with the
//! dev server and printed for the bundler by `brio resolve`.
//!
//! # Example
//!
//! ```rust,no_run
//! use brio_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod proxy;
pub mod ui;

pub use error::{CliError, ConfigError, ProxyError, Result};
