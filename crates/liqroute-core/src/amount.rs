//! Decimal-string amounts at the quoting boundary.
//!
//! Curves compute in `f64`; quotes carry amounts as strings so that every
//! consumer sees the same digits regardless of its own numeric type.

use crate::error::CoreError;

/// Parse a non-negative, finite decimal amount.
pub fn parse_amount(raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::InvalidAmount(format!("not a decimal number: {raw:?}")))?;
    if !value.is_finite() {
        return Err(CoreError::InvalidAmount(format!("not finite: {raw:?}")));
    }
    if value < 0.0 {
        return Err(CoreError::InvalidAmount(format!("negative: {raw:?}")));
    }
    Ok(value)
}

/// Render an amount as the shortest decimal string that parses back to the
/// same `f64`. Never uses exponent notation; negative zero renders as `0`.
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
