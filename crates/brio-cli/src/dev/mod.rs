//! Development server module.
//!
//! Serves the resolved configuration and forwards `server.proxy` prefixes to
//! their backend origins. Static asset serving belongs to the bundler.

pub mod config;
pub mod server;

pub use config::DevConfig;
pub use server::{CONFIG_ROUTE, DevServer, router};
