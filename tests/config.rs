use retry_delay::config::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert_eq!(config.delay.strategy, StrategyKind::CappedExponential);
    assert_eq!(config.delay.timeout_ms, 60_000);
    assert_eq!(config.delay.min_delay_ms, 1_000);
    assert_eq!(config.delay.power_by, 2.0);
    assert_eq!(config.delay.max_delay_ms, 20_000);
    assert_eq!(config.metrics.backend, MetricsBackend::Memory);
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_from_toml() {
    let file = write_config(
        r#"
[delay]
strategy = "capped_exponential"
timeout_ms = 120000
min_delay_ms = 500
power_by = 1.5
max_delay_ms = 30000
preview_attempts = 12

[metrics]
resource_type = "AWS::S3::Bucket"
backend = "prometheus"

[logging]
level = "debug"
json = true
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.delay.timeout_ms, 120_000);
    assert_eq!(config.delay.min_delay_ms, 500);
    assert_eq!(config.delay.power_by, 1.5);
    assert_eq!(config.delay.max_delay_ms, 30_000);
    assert_eq!(config.delay.preview_attempts, 12);
    assert_eq!(config.metrics.resource_type, "AWS::S3::Bucket");
    assert_eq!(config.metrics.backend, MetricsBackend::Prometheus);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert!(config.logging.file.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_minimal_toml_uses_defaults() {
    let file = write_config(
        r#"
[delay]
timeout_ms = 10000
min_delay_ms = 1000
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.delay.strategy, StrategyKind::CappedExponential);
    assert_eq!(config.delay.power_by, 2.0);
    assert_eq!(config.delay.max_delay_ms, 20_000);
    assert_eq!(config.delay.preview_attempts, 8);
    assert_eq!(config.metrics.resource_type, "AWS::Example::Resource");
    assert!(!config.logging.rotation);
}

#[test]
fn test_constant_strategy_from_toml() {
    let file = write_config(
        r#"
[delay]
strategy = "constant"
timeout_ms = 5000
min_delay_ms = 250
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.delay.strategy, StrategyKind::Constant);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unknown_strategy_fails_to_parse() {
    let file = write_config(
        r#"
[delay]
strategy = "fibonacci"
timeout_ms = 5000
min_delay_ms = 250
"#,
    );

    let err = AppConfig::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = AppConfig::from_file("/nonexistent/retry-delay.toml").unwrap_err();
    assert!(matches!(err, retry_delay::error::RetryDelayError::Io(_)));
}

#[test]
fn test_load_or_default() {
    let (config, error) = AppConfig::load_or_default("/nonexistent/file.toml");
    assert_eq!(config.delay.timeout_ms, 60_000);
    assert!(matches!(error, Some(retry_delay::error::RetryDelayError::Io(_))));
}

#[test]
fn test_load_or_default_reads_existing_file() {
    let file = write_config(
        r#"
[delay]
timeout_ms = 9000
min_delay_ms = 500
"#,
    );
    let (config, error) = AppConfig::load_or_default(file.path());
    assert_eq!(config.delay.timeout_ms, 9000);
    assert!(error.is_none());
}

#[test]
fn test_warnings_for_timeout_shorter_than_min_delay() {
    let mut config = AppConfig::default();
    assert!(config.warnings().is_empty());

    config.delay.timeout_ms = 500;
    config.delay.min_delay_ms = 1_000;
    // still valid, only reported
    assert!(config.validate().is_ok());
    let warnings = config.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("shorter than delay.min_delay_ms"));
}

#[test]
fn test_no_warning_for_constant_strategy() {
    let mut config = AppConfig::default();
    config.delay.strategy = StrategyKind::Constant;
    config.delay.timeout_ms = 5_000;
    config.delay.min_delay_ms = 1_000;
    assert!(config.warnings().is_empty());
}

#[test]
fn test_validate_rejects_invalid_power() {
    let mut config = AppConfig::default();
    config.delay.power_by = 0.5;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("powerBy >= 1.0"));
}

#[test]
fn test_validate_rejects_negative_min_delay() {
    let mut config = AppConfig::default();
    config.delay.min_delay_ms = -100;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_resource_type() {
    let mut config = AppConfig::default();
    config.metrics.resource_type = "   ".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("resource_type"));
}

#[test]
fn test_validate_rejects_bad_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "retry_delay=loud".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Invalid logging.level"));
}

#[test]
fn test_validate_rejects_rotation_without_file() {
    let mut config = AppConfig::default();
    config.logging.rotation = true;
    assert!(config.validate().is_err());

    config.logging.file = Some("logs/retry-delay.log".to_string());
    assert!(config.validate().is_ok());
}
