//! Configuration management for the fee calculator
//!
//! Loads from YAML files + environment variables via .env

mod types;

pub use types::*;

use crate::types::{FeeSchedule, TradeInput, TradeOptions};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    /// Exchange fee rates in percent
    pub fees: FeeSchedule,
    /// The trade to evaluate
    pub trade: TradeInput,
}

impl AppConfig {
    /// Load configuration from the default files and environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering `path` (if given) over the default files
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        Self::load_with(path, Self::environment())
    }

    /// Environment source for KRAKEN_FEES__SECTION__KEY variables
    pub fn environment() -> Environment {
        Environment::with_prefix("KRAKEN_FEES").separator("__")
    }

    /// Load with an explicit environment source, the last and strongest layer
    pub fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            // Logging defaults
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("output.format", "json")?
            // Kraken base tier
            .set_default("fees.maker", 0.16)?
            .set_default("fees.taker", 0.26)?
            // Example trade
            .set_default("trade.asset", "btc")?
            .set_default("trade.amount", 1.0)?
            .set_default("trade.direction", "long")?
            .set_default("trade.price_in", 3500.0)?
            .set_default("trade.type_in", "maker")?
            .set_default("trade.price_out", 4000.0)?
            .set_default("trade.type_out", "maker")?
            .set_default("trade.leverage", 1.0)?
            .set_default("trade.duration", 0)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // Override with environment variables (KRAKEN_FEES__*)
            .add_source(env)
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Calculator input assembled from the `fees` and `trade` sections
    pub fn options(&self) -> TradeOptions {
        TradeOptions {
            fees: self.fees,
            trade: self.trade.clone(),
        }
    }

    /// Generate a one-line digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "maker={}% taker={}% asset={} direction={} amount={} in={}({}) out={}({}) leverage={} duration={}",
            self.fees.maker,
            self.fees.taker,
            self.trade.asset,
            self.trade.direction,
            self.trade.amount,
            self.trade.price_in,
            self.trade.type_in,
            self.trade.price_out,
            self.trade.type_out,
            self.trade.leverage,
            self.trade.duration
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

// These tests pin the environment layer to an explicit map so variables on
// the host cannot leak in. They still read config/default.yaml and assume no
// config/local.yaml is present.
#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;
    use std::fs;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::environment().source(Some(map))
    }

    fn load(path: Option<&Path>) -> AppConfig {
        AppConfig::load_with(path, env(&[])).unwrap()
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let file = format!("kraken_fees_{}_{}", std::process::id(), name);
        let path = std::env::temp_dir().join(file);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_match_example_trade() {
        let cfg = load(None);
        assert_eq!(cfg.fees, FeeSchedule::default());
        assert_eq!(cfg.trade.asset, "btc");
        assert_eq!(cfg.trade.direction, "long");
        assert_eq!(cfg.trade.duration, 0);
        assert_eq!(cfg.logging.format, LogFormat::Pretty);
        assert_eq!(cfg.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_temp(
            "short.yaml",
            "fees:\n  taker: 0.4\ntrade:\n  direction: short\n  leverage: 2\n  duration: 5\noutput:\n  format: yaml\n",
        );

        let cfg = load(Some(&path));
        fs::remove_file(&path).ok();

        assert_eq!(cfg.fees.maker, 0.16);
        assert_eq!(cfg.fees.taker, 0.4);
        assert_eq!(cfg.trade.direction, "short");
        assert_eq!(cfg.trade.leverage, 2.0);
        assert_eq!(cfg.trade.duration, 5);
        assert_eq!(cfg.output.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("kraken_fees_does_not_exist.yaml");
        assert!(AppConfig::load_with(Some(&path), env(&[])).is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = write_temp("env.yaml", "trade:\n  leverage: 2\n  asset: eth\n");

        let cfg = AppConfig::load_with(
            Some(&path),
            env(&[
                ("KRAKEN_FEES__TRADE__LEVERAGE", "3"),
                ("KRAKEN_FEES__TRADE__TYPE_OUT", "taker"),
                ("KRAKEN_FEES__FEES__MAKER", "0.1"),
            ]),
        )
        .unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(cfg.trade.leverage, 3.0);
        assert_eq!(cfg.trade.type_out, "taker");
        assert_eq!(cfg.fees.maker, 0.1);
        // untouched by the environment
        assert_eq!(cfg.trade.asset, "eth");
    }

    #[test]
    fn test_digest() {
        let cfg = load(None);
        let digest = cfg.to_string();
        assert!(digest.contains("maker=0.16%"));
        assert!(digest.contains("direction=long"));
        assert!(digest.contains("leverage=1"));
    }
}
