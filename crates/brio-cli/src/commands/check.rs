//! Check command implementation.
//!
//! Validates configuration without starting anything.

use brio_config::{ConfigValidator, FsValidator};

use crate::cli::CheckArgs;
use crate::config::{CliOverrides, load_project};
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// Loading already runs the schema checks; `--fs` additionally requires
/// every alias target to exist. Warnings are printed but do not fail the
/// check.
pub fn execute(args: CheckArgs) -> Result<()> {
    let project = load_project(&args.project, &CliOverrides::default())?;

    match &project.source {
        Some(path) => ui::info(&format!("Checking {}", path.display())),
        None => ui::warning("No brio.toml or package.json#brio found, using defaults"),
    }

    if args.fs {
        FsValidator::new(&project.root).validate(&project.config)?;
    }

    for (key, replacement) in project.resolved.define.replacements() {
        tracing::debug!(key, replacement = %replacement, "define");
    }

    for warning in project.resolved.warnings() {
        ui::warning(warning);
    }

    let resolved = &project.resolved;
    ui::success(&format!(
        "Configuration is valid ({} mode: {} plugins, {} aliases, {} proxy rules)",
        project.mode,
        resolved.plugins.len(),
        resolved.resolve.alias.len(),
        resolved.server.proxy.len()
    ));
    Ok(())
}
