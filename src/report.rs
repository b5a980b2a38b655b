//! Display rounding at the output boundary
//!
//! Money is rounded to 2 decimals and the accumulation to 8, both midpoint
//! away from zero. The serialized shape groups fields the way the Kraken
//! calculator always presented them: the input echo, the fees, the result.

use crate::calculator::TradeResult;
use crate::error::{CalculatorError, Result};
use crate::types::TradeOptions;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places for money
pub const MONEY_DP: u32 = 2;
/// Decimal places for asset quantities
pub const AMOUNT_DP: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeesReport {
    pub opening: Decimal,
    pub closing: Decimal,
    pub margin_opening: Decimal,
    pub margin_rollover: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultReport {
    pub value_in: Decimal,
    pub value_out: Decimal,
    pub total_fees: Decimal,
    pub profit: Decimal,
    pub net_profit: Decimal,
    pub net_profit_percentage: Decimal,
    pub accumulation: Option<Decimal>,
    pub accumulation_percentage: Option<Decimal>,
}

/// Rounded, serializable view of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReport {
    pub config: TradeOptions,
    pub fees: FeesReport,
    pub result: ResultReport,
}

impl TradeReport {
    pub fn new(config: TradeOptions, result: &TradeResult) -> Result<Self> {
        let fees = FeesReport {
            opening: round_to(result.fees.opening, MONEY_DP, "opening")?,
            closing: round_to(result.fees.closing, MONEY_DP, "closing")?,
            margin_opening: round_to(result.fees.margin_opening, MONEY_DP, "margin_opening")?,
            margin_rollover: round_to(result.fees.margin_rollover, MONEY_DP, "margin_rollover")?,
        };

        let (accumulation, accumulation_percentage) = match result.accumulation {
            Some(acc) => (
                Some(round_to(acc.amount, AMOUNT_DP, "accumulation")?),
                Some(round_to(acc.percentage, MONEY_DP, "accumulation_percentage")?),
            ),
            None => (None, None),
        };

        let result = ResultReport {
            value_in: round_to(result.value_in, MONEY_DP, "value_in")?,
            value_out: round_to(result.value_out, MONEY_DP, "value_out")?,
            total_fees: round_to(result.total_fees, MONEY_DP, "total_fees")?,
            profit: round_to(result.profit, MONEY_DP, "profit")?,
            net_profit: round_to(result.net_profit, MONEY_DP, "net_profit")?,
            net_profit_percentage: round_to(
                result.net_profit_percentage,
                MONEY_DP,
                "net_profit_percentage",
            )?,
            accumulation,
            accumulation_percentage,
        };

        Ok(Self {
            config,
            fees,
            result,
        })
    }
}

/// Round `value` to `dp` places with a fixed scale, so 5.6 displays as "5.60"
pub fn round_to(value: f64, dp: u32, field: &'static str) -> Result<Decimal> {
    // `TradeResult::ensure_finite` keeps NaN out; only magnitudes beyond Decimal fail here
    debug_assert!(!value.is_nan(), "{field} is NaN");
    let mut rounded = Decimal::from_f64(value)
        .ok_or(CalculatorError::OutOfRange { field, value })?
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    Ok(rounded)
}
