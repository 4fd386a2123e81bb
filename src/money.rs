//! Money
//!
//! Catalog prices are decimal amounts in major units (dollars); the payment gateway
//! speaks minor units (cents). Conversions happen only here.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

/// Decimal places of the major unit.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Errors raised while converting between major and minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount does not fit in an `i64` count of minor units.
    #[error("amount is out of range for minor units")]
    OutOfRange,
}

/// Convert a major-unit amount to minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`MoneyError::OutOfRange`] when the result does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .ok_or(MoneyError::OutOfRange)
}

/// Convert a minor-unit amount back to major units.
#[must_use]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

/// Round a major-unit amount to whole minor units.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn whole_amounts_convert_exactly() -> TestResult {
        assert_eq!(to_minor_units(Decimal::from(25))?, 2_500);

        Ok(())
    }

    #[test]
    fn half_cents_round_up() -> TestResult {
        assert_eq!(to_minor_units(Decimal::from_str("19.995")?)?, 2_000);
        assert_eq!(to_minor_units(Decimal::from_str("19.994")?)?, 1_999);

        Ok(())
    }

    #[test]
    fn huge_amounts_are_rejected() {
        assert_eq!(to_minor_units(Decimal::MAX), Err(MoneyError::OutOfRange));
    }

    #[test]
    fn minor_units_convert_back_with_two_places() -> TestResult {
        assert_eq!(from_minor_units(12_345), Decimal::from_str("123.45")?);

        Ok(())
    }
}
