//! Command implementations for the Brio CLI.
//!
//! - [`dev`] - Development server with the configured proxy rules
//! - [`check`] - Configuration validation
//! - [`resolve`] - Resolved configuration as JSON for the bundler
//!
//! Each command provides an `execute` function that takes the parsed command
//! arguments and returns a Result.

pub mod check;
pub mod dev;
pub mod resolve;

pub use check::execute as check_execute;
pub use dev::execute as dev_execute;
pub use resolve::execute as resolve_execute;
