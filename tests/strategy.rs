use retry_delay::clock::ManualClock;
use retry_delay::config::{DelayConfig, StrategyKind};
use retry_delay::delay::{CappedExponential, Constant, Delay, DelayStrategy};
use retry_delay::error::{InvalidArgumentError, RetryDelayError};
use retry_delay::strategy::{create_strategy, create_strategy_with_clock};
use std::sync::Arc;
use std::time::Duration;

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

#[test]
fn test_default_config_builds_capped_exponential() {
    let clock = Arc::new(ManualClock::new());
    let strategy = create_strategy_with_clock(&DelayConfig::default(), clock.clone()).unwrap();

    assert!(matches!(*strategy, DelayStrategy::CappedExponential(_)));
    assert_eq!(strategy.kind(), "capped_exponential");
    assert_eq!(strategy.timeout(), secs(60));
    assert_eq!(strategy.min_delay(), secs(1));
    assert_eq!(
        strategy.schedule(7),
        vec![secs(1), secs(1), secs(2), secs(4), secs(8), secs(16), secs(20)]
    );
}

#[test]
fn test_schedule_after_expiry() {
    let clock = Arc::new(ManualClock::new());
    let strategy = create_strategy_with_clock(&DelayConfig::default(), clock.clone()).unwrap();

    assert!(!strategy.is_expired());
    clock.advance(secs(61));
    assert!(strategy.is_expired());
    assert_eq!(
        strategy.schedule(4),
        vec![secs(1), Duration::ZERO, Duration::ZERO, Duration::ZERO]
    );
}

#[test]
fn test_constant_config() {
    let clock = Arc::new(ManualClock::new());
    let config = DelayConfig {
        strategy: StrategyKind::Constant,
        timeout_ms: 10_000,
        min_delay_ms: 750,
        ..DelayConfig::default()
    };
    let strategy = create_strategy_with_clock(&config, clock.clone()).unwrap();

    assert_eq!(strategy.kind(), "constant");
    assert_eq!(strategy.next_delay(5), Duration::from_millis(750));
}

#[test]
fn test_negative_max_delay_is_rejected() {
    let config = DelayConfig {
        max_delay_ms: -1,
        ..DelayConfig::default()
    };
    let err = create_strategy(&config).unwrap_err();
    assert!(matches!(
        err,
        RetryDelayError::InvalidArgument(InvalidArgumentError::NegativeDuration {
            field: "maxDelay",
            millis: -1
        })
    ));
}

#[test]
fn test_negative_timeout_is_rejected() {
    let config = DelayConfig {
        timeout_ms: -5,
        ..DelayConfig::default()
    };
    let err = create_strategy(&config).unwrap_err();
    assert!(err.to_string().contains("timeout must be >= 0"));
}

#[test]
fn test_power_checked_before_negative_max_delay() {
    let config = DelayConfig {
        power_by: 0.5,
        max_delay_ms: -1,
        ..DelayConfig::default()
    };
    let err = create_strategy(&config).unwrap_err();
    assert!(matches!(
        err,
        RetryDelayError::InvalidArgument(InvalidArgumentError::PowerByTooSmall { .. })
    ));
}

#[test]
fn test_max_below_min_is_rejected() {
    let config = DelayConfig {
        min_delay_ms: 30_000,
        max_delay_ms: 20_000,
        ..DelayConfig::default()
    };
    assert!(matches!(
        create_strategy(&config),
        Err(RetryDelayError::InvalidArgument(
            InvalidArgumentError::MaxDelayBelowMinDelay { .. }
        ))
    ));
}

#[test]
fn test_constant_ignores_exponential_fields() {
    let config = DelayConfig {
        strategy: StrategyKind::Constant,
        timeout_ms: 5_000,
        min_delay_ms: 1_000,
        power_by: 0.1,
        max_delay_ms: -10,
        ..DelayConfig::default()
    };
    assert!(create_strategy(&config).is_ok());
}

#[test]
fn test_enum_from_concrete_strategies() {
    let clock = Arc::new(ManualClock::new());
    let exponential: DelayStrategy = CappedExponential::builder()
        .timeout(secs(60))
        .min_delay(secs(2))
        .power_by(3.0)
        .max_delay(secs(60))
        .clock(clock.clone())
        .build()
        .unwrap()
        .into();
    let constant: DelayStrategy = Constant::builder()
        .timeout(secs(60))
        .delay(secs(2))
        .clock(clock.clone())
        .build()
        .unwrap()
        .into();

    assert_eq!(exponential.next_delay(3), secs(18));
    assert_eq!(constant.next_delay(3), secs(2));
}

#[test]
fn test_strategies_behind_trait_object() {
    let clock = Arc::new(ManualClock::new());
    let strategies: Vec<Box<dyn Delay>> = vec![
        Box::new(
            CappedExponential::builder()
                .timeout(secs(60))
                .min_delay(secs(1))
                .clock(clock.clone())
                .build()
                .unwrap(),
        ),
        Box::new(
            Constant::builder()
                .timeout(secs(60))
                .delay(secs(1))
                .clock(clock.clone())
                .build()
                .unwrap(),
        ),
    ];

    for strategy in &strategies {
        assert_eq!(strategy.next_delay(0), secs(1));
    }
    clock.advance(secs(120));
    for strategy in &strategies {
        assert_eq!(strategy.next_delay(1), Duration::ZERO);
    }
}
