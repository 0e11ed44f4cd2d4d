//! Line amount calculation.
//!
//! This module derives the ex-GST, GST, and inc-GST amounts for a single
//! invoice line from its hours, rate, and the payee's GST regime.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{GstMode, GstRegime};

use super::rounding::round_money;

/// Returns the GST rate (10%).
pub fn gst_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Returns the divisor that carves GST out of an inclusive amount (1.10).
pub fn gst_divisor() -> Decimal {
    Decimal::new(110, 2)
}

/// The three monetary figures for one invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    /// The line amount excluding GST.
    pub amount_ex_gst: Decimal,
    /// The GST portion.
    pub gst_amount: Decimal,
    /// The line amount including GST.
    pub amount_inc_gst: Decimal,
}

/// Calculates the amounts for one invoice line.
///
/// Each intermediate figure is rounded independently with the money rounding
/// primitive; cumulative rounding matches statutory invoicing convention
/// rather than rounding once at the end.
///
/// - Not registered: no GST; ex-GST and inc-GST are the same rounded figure.
/// - Registered, exclusive: GST is 10% of the rounded ex-GST amount, added
///   on top.
/// - Registered, inclusive: the rounded hours-times-rate figure is the
///   inc-GST amount; the ex-GST amount is carved out by dividing by 1.10,
///   and the GST figure is the difference of the two already-rounded values
///   so the three always reconcile exactly.
///
/// # Arguments
///
/// * `charged_hours` - Hours charged; may be negative for deduction lines
/// * `rate_per_hour` - The hourly rate; must not be negative
/// * `regime` - The payee's validated GST regime
///
/// # Returns
///
/// Returns the three amounts, or `NegativeRate` if the rate is negative.
///
/// # Examples
///
/// ```
/// use rcti_engine::calculation::calculate_line_amounts;
/// use rcti_engine::models::{GstMode, GstRegime};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amounts = calculate_line_amounts(
///     Decimal::from_str("8").unwrap(),
///     Decimal::from_str("50").unwrap(),
///     &GstRegime::Registered(GstMode::Exclusive),
/// )
/// .unwrap();
/// assert_eq!(amounts.amount_ex_gst, Decimal::from_str("400.00").unwrap());
/// assert_eq!(amounts.gst_amount, Decimal::from_str("40.00").unwrap());
/// assert_eq!(amounts.amount_inc_gst, Decimal::from_str("440.00").unwrap());
/// ```
pub fn calculate_line_amounts(
    charged_hours: Decimal,
    rate_per_hour: Decimal,
    regime: &GstRegime,
) -> EngineResult<LineAmounts> {
    if rate_per_hour < Decimal::ZERO {
        return Err(EngineError::NegativeRate {
            rate: rate_per_hour,
        });
    }

    let base = round_money(charged_hours * rate_per_hour);

    let amounts = match regime {
        GstRegime::NotRegistered => LineAmounts {
            amount_ex_gst: base,
            gst_amount: Decimal::ZERO,
            amount_inc_gst: base,
        },
        GstRegime::Registered(GstMode::Exclusive) => {
            let gst_amount = round_money(base * gst_rate());
            LineAmounts {
                amount_ex_gst: base,
                gst_amount,
                amount_inc_gst: round_money(base + gst_amount),
            }
        }
        GstRegime::Registered(GstMode::Inclusive) => {
            let amount_ex_gst = round_money(base / gst_divisor());
            LineAmounts {
                amount_ex_gst,
                // Difference of two already-rounded figures, never a third
                // independent rounding, so the line always reconciles.
                gst_amount: base - amount_ex_gst,
                amount_inc_gst: base,
            }
        }
    };

    Ok(amounts)
}
