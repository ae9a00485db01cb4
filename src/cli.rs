use crate::config::AppConfig;
use crate::error::{RetryDelayError, RetryDelayResult};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Config file read when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Print the retry delay schedule for a configured strategy
#[derive(Parser, Debug)]
#[command(name = "retry-delay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file. Without it `config.toml` is used when
    /// present, otherwise the built-in defaults.
    pub config: Option<PathBuf>,

    /// Print the schedule as JSON
    #[arg(long)]
    pub json: bool,
}

/// Configuration plus the reason defaults were used, if they were.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub fallback: Option<RetryDelayError>,
}

impl Cli {
    pub fn load_config(&self) -> RetryDelayResult<LoadedConfig> {
        load_config_from(self.config.as_deref(), Path::new(DEFAULT_CONFIG_PATH))
    }
}

/// An explicit path must load; the implicit one may fall back to defaults.
pub fn load_config_from(
    explicit: Option<&Path>,
    implicit: &Path,
) -> RetryDelayResult<LoadedConfig> {
    match explicit {
        Some(path) => Ok(LoadedConfig {
            config: AppConfig::from_file(path)?,
            fallback: None,
        }),
        None => {
            let (config, fallback) = AppConfig::load_or_default(implicit);
            Ok(LoadedConfig { config, fallback })
        }
    }
}
