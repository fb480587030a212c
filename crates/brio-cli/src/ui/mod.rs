//! Terminal status lines.
//!
//! Diagnostics go through `tracing`; these helpers print the few human-facing
//! lines (server address, warnings from `brio check`) to stderr.
//!
//! ```no_run
//! use brio_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Dev server running at http://127.0.0.1:3002");
//! ui::warning("terserOptions has no effect while build.minify is false");
//! ```

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(true);
static QUIET: AtomicBool = AtomicBool::new(false);

/// Decide once whether status lines are coloured.
///
/// `--no-color` wins, then `NO_COLOR`/`FORCE_COLOR`, then terminal detection.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && crate::logger::should_use_colors();
    COLORS.store(enabled, Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Silence every status line. Set from `--quiet`; errors still reach stderr
/// through the miette report.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub(crate) fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn no_color_flag_disables_colors() {
        unsafe {
            std::env::set_var("FORCE_COLOR", "1");
        }
        init_colors(true);
        assert!(!colors_enabled());

        init_colors(false);
        assert!(colors_enabled());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    #[serial]
    fn quiet_is_toggled() {
        set_quiet(true);
        assert!(is_quiet());
        success("not printed");

        set_quiet(false);
        assert!(!is_quiet());
    }
}
