//! Conversion between major currency units and provider minor units.
//!
//! Prices are stored as `NUMERIC(12,2)` and surface as [`Decimal`] with two
//! decimal places. The payment provider speaks integer minor units
//! (centavos), so the checkout path converts at this boundary and nowhere
//! else.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::AppError;
use crate::result::AppResult;

/// Minor units per major unit for all supported currencies (2-decimal).
const MINOR_PER_MAJOR: i64 = 100;

/// Convert a major-unit amount to integer minor units.
///
/// Rejects negative amounts and amounts with sub-centavo precision so a
/// malformed price can never reach the provider silently truncated.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    if amount.is_sign_negative() {
        return Err(AppError::validation("Amount must not be negative"));
    }
    let minor = amount * Decimal::from(MINOR_PER_MAJOR);
    if minor.fract() != Decimal::ZERO {
        return Err(AppError::validation(
            "Amount has sub-centavo precision and cannot be charged",
        ));
    }
    minor
        .to_i64()
        .ok_or_else(|| AppError::validation("Amount is too large to charge"))
}

/// Convert integer minor units back to a major-unit amount.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}
