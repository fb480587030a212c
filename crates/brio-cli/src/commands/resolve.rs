//! Resolve command implementation.

use std::io::Write;

use crate::cli::ResolveArgs;
use crate::config::{CliOverrides, load_project};
use crate::error::Result;

/// Print the resolved configuration to stdout.
///
/// Only the JSON goes to stdout so the output can be piped to the bundler;
/// warnings are logged to stderr while loading.
pub fn execute(args: ResolveArgs) -> Result<()> {
    let project = load_project(&args.project, &CliOverrides::default())?;
    let json = project.resolved.to_json(args.pretty)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()?;
    Ok(())
}
