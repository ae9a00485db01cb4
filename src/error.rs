/// Error types for retry delay strategies
use std::time::Duration;
use thiserror::Error;

/// Main error type for retry-delay operations
#[derive(Error, Debug)]
pub enum RetryDelayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Strategy construction rejected its arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgumentError),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics registry errors
    #[error("Metrics error: {0}")]
    Metrics(String),
}

/// Argument validation failures raised while building a strategy.
///
/// No strategy instance exists when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidArgumentError {
    /// Growth exponent below 1.0 (or NaN)
    #[error("powerBy >= 1.0 (got {power_by})")]
    PowerByTooSmall { power_by: f64 },

    /// A duration parameter was negative
    #[error("{field} must be >= 0 (got {millis}ms)")]
    NegativeDuration { field: &'static str, millis: i64 },

    /// Cap below the floor delay
    #[error("maxDelay ({max_delay:?}) must be >= minDelay ({min_delay:?})")]
    MaxDelayBelowMinDelay {
        max_delay: Duration,
        min_delay: Duration,
    },

    /// Constant delay longer than the whole budget
    #[error("delay ({delay:?}) must be <= timeout ({timeout:?})")]
    DelayExceedsTimeout { delay: Duration, timeout: Duration },
}

/// Result type alias for convenience
pub type RetryDelayResult<T> = Result<T, RetryDelayError>;

/// Helper trait to convert errors to [`RetryDelayError`].
///
/// Wraps errors from parsing or file handling into
/// [`RetryDelayError::Config`] with additional context.
///
/// # Example
///
/// ```rust
/// use retry_delay::error::ToRetryDelayError;
///
/// let result: Result<String, &'static str> = Err("invalid format");
/// let converted = result.to_retry_delay_error("TOML parsing").unwrap_err();
/// assert!(converted.to_string().contains("TOML parsing"));
/// ```
pub trait ToRetryDelayError<T> {
    /// Convert the result to a [`RetryDelayResult`] with context.
    fn to_retry_delay_error(self, context: &str) -> RetryDelayResult<T>;
}

impl<T, E: std::fmt::Display> ToRetryDelayError<T> for Result<T, E> {
    fn to_retry_delay_error(self, context: &str) -> RetryDelayResult<T> {
        self.map_err(|e| RetryDelayError::Config(format!("{}: {}", context, e)))
    }
}
