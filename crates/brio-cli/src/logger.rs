//! Logging infrastructure for the Brio CLI.
//!
//! This module provides a structured logging setup using the `tracing` ecosystem.
//! It supports multiple verbosity levels, colored output, and environment-based
//! configuration for debugging.
//!
//! Proxy lifecycle records are emitted under the [`PROXY_TARGET`] target so they
//! can be filtered on their own, e.g. `RUST_LOG=brio::proxy=info`.
//!
//! # Example
//!
//! ```rust,no_run
//! use brio_cli::logger::init_logger;
//! use tracing::{info, debug};
//!
//! init_logger(false, false, false);
//!
//! info!("Starting dev server");
//! debug!("Loaded config from {}", "brio.toml");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Target used for proxy lifecycle events.
pub const PROXY_TARGET: &str = "brio::proxy";

const VERBOSE_FILTER: &str = "brio=debug,brio_cli=debug,brio_config=debug";
const QUIET_FILTER: &str = "brio=error,brio_cli=error,brio_config=error";
const DEFAULT_FILTER: &str = "brio=info,brio_cli=info,brio_config=info";

/// Initialize the tracing subscriber with the specified options.
///
/// The logging level is determined in this order:
/// 1. `--verbose` flag: DEBUG for brio crates
/// 2. `--quiet` flag: ERROR only
/// 3. `RUST_LOG` environment variable: custom filter
/// 4. Default: INFO for brio crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize logger with custom environment filter.
///
/// ```rust,no_run
/// use brio_cli::logger::init_logger_with_filter;
/// use tracing_subscriber::EnvFilter;
///
/// let filter = EnvFilter::new("brio::proxy=debug,hyper=off");
/// init_logger_with_filter(filter, false);
/// ```
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Check if colored output should be enabled.
///
/// - `NO_COLOR`: If set, disables colors
/// - `FORCE_COLOR`: If set, forces colors even in non-TTY
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::Term::stdout().features().colors_supported()
}
