//! Money rounding primitive.
//!
//! This module provides the single rounding function every monetary figure
//! in the engine passes through before being stored or summed.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary value to 2 decimal places using round-half-to-even.
///
/// Ties round toward the nearest even cent ("banker's rounding"), the
/// statutory convention that avoids the bias of always rounding .5 upward.
/// Operating on `Decimal` means values like 1.005 are exact ties rather
/// than binary-float near-misses, so the tie rule actually decides them.
///
/// Total function: no error conditions, no side effects.
///
/// # Examples
///
/// ```
/// use rcti_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rounded = round_money(Decimal::from_str("1.135").unwrap());
/// assert_eq!(rounded, Decimal::from_str("1.14").unwrap());
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
