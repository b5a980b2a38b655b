//! Core types used throughout the calculator
//!
//! Defines the fee schedule, trade description and the untyped input form
//! that arrives from configuration files.

use crate::error::{CalculatorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange fee schedule. Rates are percentages (0.16 means 0.16%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub maker: f64,
    pub taker: f64,
}

impl Default for FeeSchedule {
    /// Kraken base tier
    fn default() -> Self {
        Self {
            maker: 0.16,
            taker: 0.26,
        }
    }
}

impl FeeSchedule {
    pub fn new(maker: f64, taker: f64) -> Self {
        Self { maker, taker }
    }

    /// Rate (percent) charged for the given order type
    pub fn rate(&self, fee_type: FeeType) -> f64 {
        match fee_type {
            FeeType::Maker => self.maker,
            FeeType::Taker => self.taker,
        }
    }

    /// Rejects NaN and infinite rates. Negative rates are maker rebates and are accepted.
    pub fn validate(&self) -> Result<()> {
        for fee_type in [FeeType::Maker, FeeType::Taker] {
            let rate = self.rate(fee_type);
            if !rate.is_finite() {
                return Err(CalculatorError::InvalidFeeRate {
                    fee_type: fee_type.as_str(),
                    rate,
                });
            }
        }
        Ok(())
    }
}

/// Order type for one leg of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    /// Adds liquidity
    Maker,
    /// Removes liquidity
    Taker,
}

impl FeeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeType::Maker => "maker",
            FeeType::Taker => "taker",
        }
    }

    /// Exact, case-sensitive match on the tag
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "maker" => Some(FeeType::Maker),
            "taker" => Some(FeeType::Taker),
            _ => None,
        }
    }

    /// Parse the tag for a named leg (`type_in` / `type_out`)
    pub fn parse(leg: &'static str, s: &str) -> Result<Self> {
        Self::from_tag(s).ok_or_else(|| CalculatorError::InvalidFeeType {
            leg,
            value: s.to_string(),
        })
    }
}

impl fmt::Display for FeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trading direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "long" => Some(Direction::Long),
            "short" => Some(Direction::Short),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_tag(s).ok_or_else(|| CalculatorError::InvalidDirection {
            value: s.to_string(),
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Margin fee bucket. Only the exact asset id "btc" gets the cheaper tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarginTier {
    Btc,
    Other,
}

impl MarginTier {
    pub fn for_asset(asset: &str) -> Self {
        if asset == "btc" {
            MarginTier::Btc
        } else {
            MarginTier::Other
        }
    }

    /// Margin opening / rollover rate in percent
    pub fn rate(&self) -> f64 {
        match self {
            MarginTier::Btc => 0.01,
            MarginTier::Other => 0.02,
        }
    }
}

/// A validated trade description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub asset: String,
    pub amount: f64,
    pub direction: Direction,
    pub price_in: f64,
    pub type_in: FeeType,
    pub price_out: f64,
    pub type_out: FeeType,
    /// 1.0 means no margin
    pub leverage: f64,
    /// Time units the position is held
    pub duration: u32,
}

impl TradeRequest {
    pub fn margin_tier(&self) -> MarginTier {
        MarginTier::for_asset(&self.asset)
    }

    pub fn is_leveraged(&self) -> bool {
        self.leverage > 1.0
    }

    /// Check magnitudes first, then leverage
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("amount", self.amount),
            ("price_in", self.price_in),
            ("price_out", self.price_out),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalculatorError::InvalidMagnitude { field, value });
            }
        }

        if !self.leverage.is_finite() || self.leverage < 1.0 {
            return Err(CalculatorError::InvalidLeverage {
                leverage: self.leverage,
            });
        }

        Ok(())
    }
}

/// Trade description as it arrives from YAML/JSON/env, tags still unchecked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeInput {
    pub asset: String,
    pub amount: f64,
    pub direction: String,
    pub price_in: f64,
    pub type_in: String,
    pub price_out: f64,
    pub type_out: String,
    pub leverage: f64,
    #[serde(default)]
    pub duration: u32,
}

impl TradeInput {
    /// Convert into a `TradeRequest`, validating every field
    pub fn parse(&self) -> Result<TradeRequest> {
        let type_in = FeeType::parse("type_in", &self.type_in)?;
        let type_out = FeeType::parse("type_out", &self.type_out)?;
        let direction = Direction::parse(&self.direction)?;

        let trade = TradeRequest {
            asset: self.asset.clone(),
            amount: self.amount,
            direction,
            price_in: self.price_in,
            type_in,
            price_out: self.price_out,
            type_out,
            leverage: self.leverage,
            duration: self.duration,
        };
        trade.validate()?;

        Ok(trade)
    }
}

impl From<&TradeRequest> for TradeInput {
    fn from(trade: &TradeRequest) -> Self {
        Self {
            asset: trade.asset.clone(),
            amount: trade.amount,
            direction: trade.direction.to_string(),
            price_in: trade.price_in,
            type_in: trade.type_in.to_string(),
            price_out: trade.price_out,
            type_out: trade.type_out.to_string(),
            leverage: trade.leverage,
            duration: trade.duration,
        }
    }
}

/// Fee schedule plus one trade, the full calculator input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOptions {
    pub fees: FeeSchedule,
    pub trade: TradeInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> TradeInput {
        TradeInput {
            asset: "btc".to_string(),
            amount: 1.0,
            direction: "long".to_string(),
            price_in: 3500.0,
            type_in: "maker".to_string(),
            price_out: 4000.0,
            type_out: "maker".to_string(),
            leverage: 1.0,
            duration: 0,
        }
    }

    #[test]
    fn test_rate_lookup() {
        let fees = FeeSchedule::new(0.16, 0.26);
        assert_eq!(fees.rate(FeeType::Maker), 0.16);
        assert_eq!(fees.rate(FeeType::Taker), 0.26);
    }

    #[test]
    fn test_fee_type_tags_are_exact() {
        assert_eq!(FeeType::from_tag("maker"), Some(FeeType::Maker));
        assert_eq!(FeeType::from_tag("taker"), Some(FeeType::Taker));
        assert_eq!(FeeType::from_tag("Maker"), None);
        assert_eq!(FeeType::from_tag("limit"), None);
        assert_eq!(FeeType::from_tag("fees.maker"), None);
    }

    #[test]
    fn test_margin_tier_bucketing() {
        assert_eq!(MarginTier::for_asset("btc"), MarginTier::Btc);
        assert_eq!(MarginTier::for_asset("BTC"), MarginTier::Other);
        assert_eq!(MarginTier::for_asset("eth"), MarginTier::Other);
        assert_eq!(MarginTier::Btc.rate(), 0.01);
        assert_eq!(MarginTier::Other.rate(), 0.02);
    }

    #[test]
    fn test_parse_valid_input() {
        let trade = input().parse().unwrap();
        assert_eq!(trade.direction, Direction::Long);
        assert_eq!(trade.type_in, FeeType::Maker);
        assert!(!trade.is_leveraged());
    }

    #[test]
    fn test_parse_rejects_bad_type_out() {
        let mut raw = input();
        raw.type_out = "market".to_string();
        assert_eq!(
            raw.parse(),
            Err(CalculatorError::InvalidFeeType {
                leg: "type_out",
                value: "market".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_direction() {
        let mut raw = input();
        raw.direction = "sideways".to_string();
        assert!(matches!(
            raw.parse(),
            Err(CalculatorError::InvalidDirection { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nan_price() {
        let mut raw = input();
        raw.price_out = f64::NAN;
        assert!(matches!(
            raw.parse(),
            Err(CalculatorError::InvalidMagnitude {
                field: "price_out",
                ..
            })
        ));
    }

    #[test]
    fn test_fee_schedule_accepts_rebate_rejects_nan() {
        assert!(FeeSchedule::new(-0.01, 0.26).validate().is_ok());
        assert!(matches!(
            FeeSchedule::new(0.16, f64::INFINITY).validate(),
            Err(CalculatorError::InvalidFeeRate {
                fee_type: "taker",
                ..
            })
        ));
    }

    #[test]
    fn test_input_roundtrips_from_request() {
        let trade = input().parse().unwrap();
        assert_eq!(TradeInput::from(&trade), input());
    }

    #[test]
    fn test_duration_defaults_to_zero() {
        let json = r#"{"asset":"eth","amount":2,"direction":"short","price_in":100,
            "type_in":"taker","price_out":90,"type_out":"maker","leverage":3}"#;
        let raw: TradeInput = serde_json::from_str(json).unwrap();
        assert_eq!(raw.duration, 0);
    }
}
