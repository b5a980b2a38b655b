//! Kraken fees calculator
//!
//! Usage: kraken-fees [CONFIG_FILE]
//!
//! Evaluates the trade described by the configuration and prints the
//! rounded report on stdout.

use anyhow::Context;
use kraken_fees::calculate_options;
use kraken_fees::config::AppConfig;
use kraken_fees::logging;
use std::path::PathBuf;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load_from(path.as_deref())?;

    logging::init(&config.logging)?;
    info!("Config: {}", config);

    let report = calculate_options(&config.options()).context("Trade calculation failed")?;

    info!(
        total_fees = %report.result.total_fees,
        net_profit = %report.result.net_profit,
        "✅ Calculation complete"
    );

    println!("{}", config.output.render(&report)?);

    Ok(())
}
