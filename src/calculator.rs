//! Fee and profit calculation for a single trade
//!
//! `calculate` validates the whole input up front, then runs the fee
//! formulas at full `f64` precision. Nothing is rounded here.

use crate::error::{CalculatorError, Result};
use crate::fees;
use crate::report::TradeReport;
use crate::types::{Direction, FeeSchedule, TradeOptions, TradeRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fees owed on one trade, unrounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub opening: f64,
    pub closing: f64,
    pub margin_opening: f64,
    pub margin_rollover: f64,
}

impl FeeBreakdown {
    pub fn total(&self) -> f64 {
        self.opening + self.closing + self.margin_opening + self.margin_rollover
    }
}

/// Re-buy estimate for a short: how much asset the proceeds buy back at exit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accumulation {
    pub amount: f64,
    /// Change versus the original amount, in percent
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeResult {
    pub fees: FeeBreakdown,
    /// Leverage the margin fees were computed for
    pub leverage: f64,
    pub value_in: f64,
    pub value_out: f64,
    pub total_fees: f64,
    pub profit: f64,
    pub net_profit: f64,
    pub net_profit_percentage: f64,
    /// Only present for short trades
    pub accumulation: Option<Accumulation>,
}

impl TradeResult {
    /// Fails on the first NaN or infinite field
    pub fn ensure_finite(&self) -> Result<()> {
        let mut fields = vec![
            ("opening", self.fees.opening),
            ("closing", self.fees.closing),
            ("margin_opening", self.fees.margin_opening),
            ("margin_rollover", self.fees.margin_rollover),
            ("total_fees", self.total_fees),
            ("profit", self.profit),
            ("net_profit", self.net_profit),
            ("net_profit_percentage", self.net_profit_percentage),
        ];
        if let Some(acc) = self.accumulation {
            fields.push(("accumulation", acc.amount));
            fields.push(("accumulation_percentage", acc.percentage));
        }

        match fields.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, value)) => Err(CalculatorError::OutOfRange { field, value }),
            None => Ok(()),
        }
    }
}

/// Stateless calculator bound to one exchange fee schedule
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeeCalculator {
    schedule: FeeSchedule,
}

impl FeeCalculator {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Compute fees and profit for `trade`
    pub fn calculate(&self, trade: &TradeRequest) -> Result<TradeResult> {
        trade.validate()?;
        self.schedule.validate()?;

        let rate_in = self.schedule.rate(trade.type_in);
        let rate_out = self.schedule.rate(trade.type_out);

        let value_in = checked_value("value_in", trade.amount, trade.price_in)?;
        let value_out = checked_value("value_out", trade.amount, trade.price_out)?;

        let margin = fees::margin_fees(trade);
        let breakdown = FeeBreakdown {
            opening: fees::transaction_fee(rate_in, trade.amount, trade.price_in),
            closing: fees::transaction_fee(rate_out, trade.amount, trade.price_out),
            margin_opening: margin.opening,
            margin_rollover: margin.rollover,
        };
        let total_fees = breakdown.total();

        let profit = gross_profit(trade.direction, trade.price_in, trade.price_out, trade.amount);
        let net_profit = profit - total_fees;

        let accumulation = match trade.direction {
            Direction::Long => None,
            Direction::Short => {
                let amount =
                    fees::max_buyable_amount(value_in - breakdown.opening, trade.price_out, rate_out);
                Some(Accumulation {
                    amount,
                    percentage: (amount / trade.amount - 1.0) * 100.0,
                })
            }
        };

        let result = TradeResult {
            fees: breakdown,
            leverage: margin.leverage,
            value_in,
            value_out,
            total_fees,
            profit,
            net_profit,
            net_profit_percentage: net_profit_percentage(value_in, net_profit),
            accumulation,
        };
        result.ensure_finite()?;

        debug!(
            asset = %trade.asset,
            direction = %trade.direction,
            leverage = trade.leverage,
            total_fees = result.total_fees,
            net_profit = result.net_profit,
            "trade calculated"
        );

        Ok(result)
    }
}

/// Compute fees and profit for `trade` under `schedule`
pub fn calculate(schedule: &FeeSchedule, trade: &TradeRequest) -> Result<TradeResult> {
    FeeCalculator::new(*schedule).calculate(trade)
}

/// Parse, calculate and round an untyped options object in one step
pub fn calculate_options(options: &TradeOptions) -> Result<TradeReport> {
    let trade = options.trade.parse()?;
    let result = calculate(&options.fees, &trade)?;
    TradeReport::new(options.clone(), &result)
}

/// Notional value of one leg. Zero (underflow) or infinite (overflow) is rejected,
/// since the percentages divide by it.
fn checked_value(field: &'static str, amount: f64, price: f64) -> Result<f64> {
    let value = fees::trade_value(amount, price);
    if value == 0.0 {
        return Err(CalculatorError::InvalidMagnitude { field, value });
    }
    if !value.is_finite() {
        return Err(CalculatorError::OutOfRange { field, value });
    }
    Ok(value)
}

/// Profit before fees
pub fn gross_profit(direction: Direction, price_in: f64, price_out: f64, amount: f64) -> f64 {
    match direction {
        Direction::Long => (price_out - price_in) * amount,
        Direction::Short => (price_in - price_out) * amount,
    }
}

/// Net profit as a percentage of the entry value
pub fn net_profit_percentage(value_in: f64, net_profit: f64) -> f64 {
    ((value_in + net_profit) / value_in - 1.0) * 100.0
}
