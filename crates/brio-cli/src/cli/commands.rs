use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::ModeArg;
use crate::cli::validation::parse_host;

/// Available Brio subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the development server
    ///
    /// Loads and validates the configuration, then serves the dev proxy:
    /// requests under a configured `server.proxy` prefix are forwarded to
    /// their backend origin and every proxy lifecycle event is logged.
    Dev(DevArgs),

    /// Validate configuration
    ///
    /// Checks brio.toml (or the "brio" field of package.json) for errors and
    /// prints non-fatal warnings.
    Check(CheckArgs),

    /// Print the resolved configuration as JSON
    ///
    /// Every mode-dependent value is decided; the output is what the bundler
    /// consumes.
    Resolve(ResolveArgs),
}

/// Options shared by every command that loads a project.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Build mode (defaults to NODE_ENV, then development)
    #[arg(short, long, value_enum, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Path to a config file
    ///
    /// Specify a custom configuration file location (.toml or .json). If not
    /// provided, searches for brio.toml, then package.json#brio.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the dev command
#[derive(Args, Debug)]
pub struct DevArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Address to bind (overrides server.host)
    #[arg(long, value_name = "HOST", value_parser = parse_host)]
    pub host: Option<String>,

    /// Port for the development server (overrides server.port)
    ///
    /// Unless --strict-port is given, the next free port is used when this
    /// one is taken.
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Exit instead of trying another port when the port is taken
    #[arg(long)]
    pub strict_port: bool,

    /// Open browser automatically on server start
    #[arg(long)]
    pub open: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Also require alias targets to exist on disk
    #[arg(long)]
    pub fs: bool,
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}
