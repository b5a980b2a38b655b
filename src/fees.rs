//! Kraken Fee Formulas
//!
//! Pure functions behind the calculator. Rates are percentages, so every
//! formula divides by 100. Nothing here rounds; rounding happens in `report`.
//!
//! Margin fees follow Kraken's flat two-tier scheme: 0.01% for BTC, 0.02% for
//! everything else, charged once on opening and once per started 4-unit
//! rollover block.

use crate::types::TradeRequest;
use serde::{Deserialize, Serialize};

/// Length of one rollover billing block, in duration units
pub const ROLLOVER_BLOCK: u32 = 4;

/// Margin fees for one position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginFees {
    pub opening: f64,
    pub rollover: f64,
    pub leverage: f64,
}

impl MarginFees {
    pub fn none() -> Self {
        Self {
            opening: 0.0,
            rollover: 0.0,
            leverage: 1.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.opening + self.rollover
    }
}

/// Notional value of `amount` units at `price`
pub fn trade_value(amount: f64, price: f64) -> f64 {
    amount * price
}

/// Exchange fee for one leg
pub fn transaction_fee(rate_pct: f64, amount: f64, price: f64) -> f64 {
    amount * price * rate_pct / 100.0
}

/// Number of billed rollover blocks. A duration of 0 still bills one block.
pub fn rollover_periods(duration: u32) -> u32 {
    duration.max(1).div_ceil(ROLLOVER_BLOCK)
}

/// Margin opening and rollover fees.
///
/// Callers must validate the trade first; leverage below 1 is rejected there.
/// Fees are charged on the position value and do not scale with leverage.
pub fn margin_fees(trade: &TradeRequest) -> MarginFees {
    if !trade.is_leveraged() {
        return MarginFees::none();
    }

    let per_period = transaction_fee(trade.margin_tier().rate(), trade.amount, trade.price_in);
    MarginFees {
        opening: per_period,
        rollover: per_period * f64::from(rollover_periods(trade.duration)),
        leverage: trade.leverage,
    }
}

/// Maximum amount of asset buyable with `value` at `price`, after paying `rate_pct`
pub fn max_buyable_amount(value: f64, price: f64, rate_pct: f64) -> f64 {
    (value / price) * (1.0 - rate_pct / 100.0)
}
