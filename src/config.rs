use crate::delay::{DEFAULT_MAX_DELAY, DEFAULT_POWER_BY};
use crate::error::{RetryDelayError, RetryDelayResult, ToRetryDelayError};
use crate::strategy::create_strategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub delay: DelayConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which delay strategy to build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    CappedExponential,
    Constant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Total retry budget in milliseconds, measured from construction
    pub timeout_ms: i64,
    /// Floor delay in milliseconds (the fixed delay for `constant`)
    pub min_delay_ms: i64,
    /// Growth exponent, `capped_exponential` only
    #[serde(default = "default_power_by")]
    pub power_by: f64,
    /// Upper bound in milliseconds, `capped_exponential` only
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: i64,
    /// How many attempts the CLI prints
    #[serde(default = "default_preview_attempts")]
    pub preview_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Resource type name scoping the metrics namespace (e.g. "AWS::S3::Bucket")
    pub resource_type: String,
    #[serde(default)]
    pub backend: MetricsBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsBackend {
    #[default]
    Memory,
    Prometheus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file path
    #[serde(default)]
    pub file: Option<String>,
    /// Emit JSON lines instead of plain text
    #[serde(default)]
    pub json: bool,
    /// Rotate the log file daily
    #[serde(default)]
    pub rotation: bool,
}

fn default_power_by() -> f64 {
    DEFAULT_POWER_BY
}

fn default_max_delay_ms() -> i64 {
    DEFAULT_MAX_DELAY.as_millis() as i64
}

fn default_preview_attempts() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::CappedExponential,
            timeout_ms: 60_000,
            min_delay_ms: 1_000,
            power_by: default_power_by(),
            max_delay_ms: default_max_delay_ms(),
            preview_attempts: default_preview_attempts(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            resource_type: "AWS::Example::Resource".to_string(),
            backend: MetricsBackend::Memory,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            json: false,
            rotation: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            delay: DelayConfig::default(),
            metrics: MetricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> RetryDelayResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).to_retry_delay_error("Failed to parse config file")
    }

    /// Load configuration from file or use default.
    ///
    /// The load error comes back alongside the defaults instead of being
    /// logged here, since this usually runs before logging is initialized.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<RetryDelayError>) {
        match Self::from_file(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Check every section without keeping anything that was built.
    pub fn validate(&self) -> RetryDelayResult<()> {
        create_strategy(&self.delay)?;

        if self.metrics.resource_type.trim().is_empty() {
            return Err(RetryDelayError::Config(
                "metrics.resource_type must not be empty".to_string(),
            ));
        }

        EnvFilter::try_new(&self.logging.level).to_retry_delay_error(&format!(
            "Invalid logging.level '{}'",
            self.logging.level
        ))?;

        if self.logging.rotation && self.logging.file.is_none() {
            return Err(RetryDelayError::Config(
                "logging.rotation requires logging.file".to_string(),
            ));
        }

        Ok(())
    }

    /// Accepted but suspicious settings, for logging once a subscriber exists.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let delay = &self.delay;
        if delay.strategy == StrategyKind::CappedExponential
            && delay.timeout_ms < delay.min_delay_ms
        {
            warnings.push(format!(
                "delay.timeout_ms ({}) is shorter than delay.min_delay_ms ({}); retries will expire early",
                delay.timeout_ms, delay.min_delay_ms
            ));
        }
        warnings
    }
}
