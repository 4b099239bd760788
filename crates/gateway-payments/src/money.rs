//! Major/minor currency unit conversion
//!
//! Callers speak in major units (dollars), the processor in integer minor
//! units (cents). Both directions go through `Decimal` so no float drift
//! reaches the processor.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::error::{PaymentError, Result};

/// Rejection message for a missing or unusable amount
pub const INVALID_AMOUNT: &str = "Valid amount is required";

/// Decimal places between major and minor units
const MINOR_UNIT_SCALE: u32 = 2;

/// Parse a caller-supplied amount in major units.
///
/// Accepts a JSON number or a numeric string. Absent, non-numeric, zero and
/// negative values are all `InvalidRequest`.
pub fn parse_amount(value: Option<&Value>) -> Result<Decimal> {
    let amount = match value {
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    }
    .ok_or_else(|| PaymentError::InvalidRequest(INVALID_AMOUNT.into()))?;

    if amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidRequest(INVALID_AMOUNT.into()));
    }

    Ok(amount)
}

/// Only plain decimal or scientific notation; `rust_decimal` alone would
/// also take digit separators such as `1_000`
fn parse_decimal(s: &str) -> Option<Decimal> {
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Convert major units to minor units, rounding half-up on the exact value.
///
/// `19.99 -> 1999`, `19.995 -> 2000`, `19.994 -> 1999`.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or_else(|| PaymentError::InvalidRequest(INVALID_AMOUNT.into()))?;

    // Sub-cent amounts round to nothing chargeable
    if minor <= 0 {
        return Err(PaymentError::InvalidRequest(INVALID_AMOUNT.into()));
    }

    Ok(minor)
}

/// Convert processor minor units back to major units (`500 -> 5.00`)
pub fn to_major_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_amount_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_amount(Some(&json!(25))).unwrap(), dec!(25));
        assert_eq!(parse_amount(Some(&json!(19.99))).unwrap(), dec!(19.99));
        assert_eq!(parse_amount(Some(&json!("12.50"))).unwrap(), dec!(12.50));
        assert_eq!(parse_amount(Some(&json!(" 25 "))).unwrap(), dec!(25));
        assert_eq!(parse_amount(Some(&json!("1e3"))).unwrap(), dec!(1000));
    }

    #[test]
    fn test_parse_amount_rejects_bad_input() {
        for value in [
            json!(0),
            json!(-5),
            json!("-0.01"),
            json!("abc"),
            json!("NaN"),
            json!(""),
            json!("1_000"),
            json!("1,000"),
            json!("0x10"),
            json!(null),
            json!(true),
            json!([10]),
            json!({"value": 10}),
        ] {
            let err = parse_amount(Some(&value)).unwrap_err();
            assert_eq!(err, PaymentError::InvalidRequest(INVALID_AMOUNT.into()), "{value}");
        }
        assert!(parse_amount(None).is_err());
    }

    #[test]
    fn test_minor_units_rounding() {
        assert_eq!(to_minor_units(dec!(19.99)).unwrap(), 1999);
        assert_eq!(to_minor_units(dec!(19.995)).unwrap(), 2000);
        assert_eq!(to_minor_units(dec!(19.994)).unwrap(), 1999);
        assert_eq!(to_minor_units(dec!(0.005)).unwrap(), 1);
        assert_eq!(to_minor_units(dec!(25)).unwrap(), 2500);
    }

    #[test]
    fn test_minor_units_rejects_unchargeable_amounts() {
        assert!(to_minor_units(dec!(0.004)).is_err());
        assert!(to_minor_units(Decimal::MAX).is_err());
    }

    #[test]
    fn test_major_units() {
        assert_eq!(to_major_units(500), dec!(5.00));
        assert_eq!(to_major_units(1999), dec!(19.99));
        assert_eq!(to_major_units(0), Decimal::ZERO);
    }
}
