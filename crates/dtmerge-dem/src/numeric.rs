//! Numeric token rules shared by header and grid parsing.
//!
//! A token with no decimal point and no exponent marker is an integer, every
//! other token is a real. Integral values are written back without a decimal
//! point so integer grids survive a load/write cycle unchanged.

use crate::{DemError, Result};

/// Largest magnitude at which every integer is exactly representable in an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Returns true if the token should be read as an integer.
pub fn is_integer_token(token: &str) -> bool {
    !token.contains(['.', 'e', 'E'])
}

/// Parse a header or grid token. Values that overflow to infinity are rejected.
pub fn parse_number(token: &str) -> Result<f64> {
    let token = token.trim();
    let value = if is_integer_token(token) {
        token.parse::<i64>().map(|v| v as f64).ok()
    } else {
        token.parse::<f64>().ok()
    };
    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| DemError::InvalidNumber(token.to_string()))
}

/// Parse a strictly positive integer count (`ncols`, `nrows`).
pub fn parse_count(token: &str) -> Result<usize> {
    let token = token.trim();
    if !is_integer_token(token) {
        return Err(DemError::InvalidNumber(token.to_string()));
    }
    match token.parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(DemError::InvalidNumber(token.to_string())),
    }
}

/// Format a value as an integer if it is exactly one, otherwise as a real.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
