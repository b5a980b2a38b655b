//! Kraken Fees Library
//!
//! Fee and profit calculator for leveraged Kraken spot/margin trades

pub mod calculator;
pub mod config;
pub mod error;
pub mod fees;
pub mod logging;
pub mod report;
pub mod types;

pub use calculator::{
    calculate, calculate_options, Accumulation, FeeBreakdown, FeeCalculator, TradeResult,
};
pub use error::CalculatorError;
pub use report::TradeReport;
pub use types::{
    Direction, FeeSchedule, FeeType, MarginTier, TradeInput, TradeOptions, TradeRequest,
};
