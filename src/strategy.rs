use crate::clock::{SharedClock, system_clock};
use crate::config::{DelayConfig, StrategyKind};
use crate::delay::{CappedExponential, Constant, DelayStrategy, duration_from_millis};
use crate::error::{InvalidArgumentError, RetryDelayResult};
use std::sync::Arc;

/// Type alias for the strategy shared between retry loops
pub type DelayStrategyType = Arc<DelayStrategy>;

/// Create a delay strategy from configuration, timed by the system clock.
///
/// The budget starts counting as soon as this returns.
pub fn create_strategy(config: &DelayConfig) -> RetryDelayResult<DelayStrategyType> {
    create_strategy_with_clock(config, system_clock())
}

/// Create a delay strategy from configuration with an explicit clock.
///
/// # Errors
///
/// Returns [`crate::error::RetryDelayError::InvalidArgument`] for negative
/// durations or any parameter the strategy builder rejects.
pub fn create_strategy_with_clock(
    config: &DelayConfig,
    clock: SharedClock,
) -> RetryDelayResult<DelayStrategyType> {
    let strategy = build(config, clock)?;
    Ok(Arc::new(strategy))
}

fn build(config: &DelayConfig, clock: SharedClock) -> Result<DelayStrategy, InvalidArgumentError> {
    let timeout = duration_from_millis("timeout", config.timeout_ms)?;
    let min_delay = duration_from_millis("minDelay", config.min_delay_ms)?;

    let strategy = match config.strategy {
        StrategyKind::CappedExponential => {
            // same order the builder checks in: exponent first, then the cap
            if !(config.power_by >= 1.0) {
                return Err(InvalidArgumentError::PowerByTooSmall {
                    power_by: config.power_by,
                });
            }
            let max_delay = duration_from_millis("maxDelay", config.max_delay_ms)?;
            CappedExponential::builder()
                .timeout(timeout)
                .min_delay(min_delay)
                .power_by(config.power_by)
                .max_delay(max_delay)
                .clock(clock)
                .build()?
                .into()
        }
        StrategyKind::Constant => Constant::builder()
            .timeout(timeout)
            .delay(min_delay)
            .clock(clock)
            .build()?
            .into(),
    };
    Ok(strategy)
}
