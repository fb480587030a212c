//! Development server command implementation.
//!
//! Loads the project, binds the server, and runs until Ctrl+C.

use std::sync::Arc;

use tokio::signal;

use crate::cli::DevArgs;
use crate::config::{CliOverrides, load_project};
use crate::dev::{DevConfig, DevServer};
use crate::error::{CliError, Result};
use crate::proxy::ProxyEngine;
use crate::ui;

/// Execute the dev command.
///
/// # Process Flow
///
/// 1. Load and validate configuration (fatal on any error, before binding)
/// 2. Pick the bind address
/// 3. Build one upstream client per proxy rule
/// 4. Serve until Ctrl+C
pub async fn execute(args: DevArgs) -> Result<()> {
    let overrides = CliOverrides::from_dev_args(&args);
    let project = load_project(&args.project, &overrides)?;
    ui::info(&format!(
        "Starting development server ({} mode)",
        project.mode
    ));

    for warning in project.resolved.warnings() {
        ui::warning(warning);
    }

    let config = DevConfig::from_server(&project.resolved.server)?;
    let engine = Arc::new(ProxyEngine::with_logging(&project.resolved.server.proxy)?);

    if engine.is_empty() {
        ui::info("No proxy rules configured; every request will be answered 404");
    }
    for rule in project.resolved.server.proxy.rules() {
        ui::info(&format!(
            "Proxy {} -> {}{}",
            rule.match_prefix,
            rule.target,
            if rule.change_origin { " (changeOrigin)" } else { "" }
        ));
    }

    let url = config.server_url();
    let open = config.open;
    let server = DevServer::new(config, project.resolved.clone(), engine);
    let handle = tokio::spawn(server.start(shutdown_signal()));

    if open {
        open_browser(&url);
    }
    ui::info("Press Ctrl+C to stop");

    handle
        .await
        .map_err(|e| CliError::Server(format!("server task failed: {}", e)))??;

    ui::success("Development server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    ui::info("Shutting down development server...");
}

/// Open the server URL in the default browser.
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Windows: `start`
/// - Linux: `xdg-open`
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {}", url)),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}
