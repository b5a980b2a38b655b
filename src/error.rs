//! Error taxonomy for the fee calculator
//!
//! Every variant traces back to a caller input defect. Nothing is retried or
//! coerced to zero.

use thiserror::Error;

/// Input validation failures. Input checks run before any computation;
/// `OutOfRange` covers results that overflow `f64` or `Decimal`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("Invalid fee type for {leg}: {value:?} (expected \"maker\" or \"taker\")")]
    InvalidFeeType { leg: &'static str, value: String },

    #[error("Invalid direction: {value:?} (expected \"long\" or \"short\")")]
    InvalidDirection { value: String },

    #[error("Invalid leverage: {leverage} (must be >= 1)")]
    InvalidLeverage { leverage: f64 },

    #[error("Invalid {field}: {value} (must be a positive finite number)")]
    InvalidMagnitude { field: &'static str, value: f64 },

    #[error("Invalid {fee_type} fee rate: {rate} (must be finite)")]
    InvalidFeeRate { fee_type: &'static str, rate: f64 },

    #[error("{field} is outside the representable range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, CalculatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_type_error_display() {
        let err = CalculatorError::InvalidFeeType {
            leg: "type_in",
            value: "limit".to_string(),
        };
        assert!(err.to_string().contains("type_in"));
        assert!(err.to_string().contains("\"limit\""));
    }

    #[test]
    fn test_magnitude_error_display() {
        let err = CalculatorError::InvalidMagnitude {
            field: "amount",
            value: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid amount: 0 (must be a positive finite number)"
        );
    }

    #[test]
    fn test_leverage_error_display() {
        let err = CalculatorError::InvalidLeverage { leverage: 0.5 };
        assert_eq!(err.to_string(), "Invalid leverage: 0.5 (must be >= 1)");
    }
}
