use brio_config::BuildMode;
use clap::ValueEnum;

/// Build mode selected on the command line
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ModeArg {
    /// Development: source maps on, console calls kept, `__DEV__` true
    #[value(name = "development", alias = "dev")]
    Development,

    /// Production: console and debugger statements dropped, `__PROD__` true
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<ModeArg> for BuildMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Development => BuildMode::Development,
            ModeArg::Production => BuildMode::Production,
        }
    }
}
