use anyhow::{Context, Result};
use clap::Parser;
use retry_delay::cli::Cli;
use retry_delay::delay::Delay;
use retry_delay::logging;
use retry_delay::strategy::create_strategy;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct ScheduleEntry {
    attempt: u32,
    delay_ms: u128,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = cli.load_config().with_context(|| match &cli.config {
        Some(path) => format!("Failed to load config file {}", path.display()),
        None => "Failed to load config".to_string(),
    })?;
    let config = loaded.config;

    // Before validation: an unparsable level runs as "info" until validate rejects it.
    let _guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging system")?;

    info!(
        "Logging initialized - level: {}, file: {:?}, json: {}",
        config.logging.level, config.logging.file, config.logging.json
    );

    if let Some(e) = loaded.fallback {
        warn!("Failed to load config, using defaults: {}", e);
    }
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    let strategy = create_strategy(&config.delay).context("Failed to build delay strategy")?;
    info!(
        "Built {} strategy: min delay {:?}, timeout {:?}",
        strategy.kind(),
        strategy.min_delay(),
        strategy.timeout()
    );

    let entries: Vec<ScheduleEntry> = (0..config.delay.preview_attempts)
        .map(|attempt| ScheduleEntry {
            attempt,
            delay_ms: strategy.next_delay(attempt).as_millis(),
        })
        .collect();

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&entries).context("Failed to serialize schedule")?;
        println!("{}", rendered);
    } else {
        for entry in &entries {
            println!("attempt {:>3}: {} ms", entry.attempt, entry.delay_ms);
        }
    }

    Ok(())
}
