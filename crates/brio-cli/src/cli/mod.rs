//! Command-line interface definition for Brio.
//!
//! This module defines the complete CLI structure using clap v4's derive macros.
//!
//! # Command Structure
//!
//! - `brio dev` - Development server with the configured proxy rules
//! - `brio check` - Configuration validation
//! - `brio resolve` - Print the resolved configuration for the bundler

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{CheckArgs, Command, DevArgs, ProjectArgs, ResolveArgs};
pub use enums::*;
pub use validation::parse_host;

/// Brio - frontend dev server and build configuration resolver
#[derive(Parser, Debug)]
#[command(
    name = "brio",
    version,
    about = "Frontend dev server and build configuration resolver",
    long_about = "Brio validates a project's build configuration once, resolves every\n\
                  mode-dependent value, hands the result to the bundler as JSON, and runs\n\
                  a development server that proxies API requests to a backend origin."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    ///
    /// Only critical errors will be displayed. Useful for CI/CD environments
    /// or when piping `brio resolve` output to other tools.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
