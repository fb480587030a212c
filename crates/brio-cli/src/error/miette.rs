//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use brio_config::ConfigError;
use miette::{MietteDiagnostic, Report};

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert a configuration error to a report with a code and, where one
/// exists, a hint for fixing the document.
pub fn config_error_to_miette(err: ConfigError) -> Report {
    let mut diagnostic =
        MietteDiagnostic::new(format!("Configuration error: {}", err)).with_code(code(&err));
    if let Some(help) = help(&err) {
        diagnostic = diagnostic.with_help(help);
    }
    Report::new(diagnostic)
}

fn code(err: &ConfigError) -> &'static str {
    match err {
        ConfigError::AliasTargetNotFound { .. } => "brio::config::alias_target_not_found",
        ConfigError::NotFound => "brio::config::not_found",
        ConfigError::UnsupportedFormat(_) => "brio::config::unsupported_format",
        ConfigError::InvalidValue { .. } => "brio::config::invalid_value",
        ConfigError::InvalidProfileOverride { .. } => "brio::config::invalid_profile",
        ConfigError::UnknownMode { .. } => "brio::config::unknown_mode",
        ConfigError::DuplicateKey { .. } => "brio::config::duplicate_key",
        ConfigError::DuplicateChunkMember { .. } => "brio::config::duplicate_chunk_member",
        ConfigError::InvalidProxyRule { .. } => "brio::config::invalid_proxy_rule",
        ConfigError::InvalidAlias { .. } => "brio::config::invalid_alias",
        ConfigError::SchemaValidation { .. } => "brio::config::schema",
        ConfigError::Io(_) => "brio::config::io",
    }
}

fn help(err: &ConfigError) -> Option<String> {
    match err {
        ConfigError::NotFound => Some(
            "Create a brio.toml file or add a \"brio\" field to package.json".to_string(),
        ),
        ConfigError::UnsupportedFormat(_) => {
            Some("Config files must be .toml or .json".to_string())
        }
        ConfigError::UnknownMode { .. } => Some(
            "Pass --mode development|production or set NODE_ENV to one of those values"
                .to_string(),
        ),
        ConfigError::DuplicateKey { .. } => {
            Some("Each key may appear only once; remove or rename the repeat".to_string())
        }
        ConfigError::DuplicateChunkMember { .. } => {
            Some("A module can belong to only one manual chunk".to_string())
        }
        ConfigError::InvalidProxyRule { .. } => Some(
            "Prefixes must start with '/' and targets must be absolute http(s) URLs, \
             e.g. target = \"http://localhost:8001\""
                .to_string(),
        ),
        ConfigError::AliasTargetNotFound { .. } => {
            Some("Create the directory or fix the alias path".to_string())
        }
        ConfigError::SchemaValidation { hint, .. } => hint.clone(),
        _ => None,
    }
}
