pub mod cli;
pub mod clock;
pub mod config;
pub mod delay;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod strategy;
pub mod utils;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::{AppConfig, DelayConfig, LoggingConfig, MetricsConfig, StrategyKind};
pub use delay::{CappedExponential, Constant, Delay, DelayStrategy};
pub use error::{InvalidArgumentError, RetryDelayError, RetryDelayResult};
pub use metrics::{Action, MetricsPublisher};
pub use strategy::{DelayStrategyType, create_strategy, create_strategy_with_clock};
