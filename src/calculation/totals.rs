//! Invoice totals aggregation.
//!
//! This module sums an arbitrary list of invoice lines into subtotal, GST,
//! and total figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::InvoiceLine;

use super::rounding::round_money;

/// The aggregated totals of an invoice's line set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RctiTotals {
    /// Sum of line ex-GST amounts.
    pub subtotal: Decimal,
    /// Sum of line GST amounts.
    pub gst: Decimal,
    /// Sum of line inc-GST amounts.
    pub total: Decimal,
}

/// Sums a list of lines into invoice totals.
///
/// Lines are undifferentiated: job lines, break deductions, tolls, and fuel
/// levies all aggregate the same way. Unlike the per-line calculator, each
/// figure here is rounded once on the final sum, not per addend. Totals may
/// legally be negative when deductions exceed charges; an empty line set
/// yields all-zero totals.
///
/// # Examples
///
/// ```
/// use rcti_engine::calculation::calculate_rcti_totals;
/// use rust_decimal::Decimal;
///
/// let totals = calculate_rcti_totals(&[]);
/// assert_eq!(totals.subtotal, Decimal::ZERO);
/// assert_eq!(totals.gst, Decimal::ZERO);
/// assert_eq!(totals.total, Decimal::ZERO);
/// ```
pub fn calculate_rcti_totals(lines: &[InvoiceLine]) -> RctiTotals {
    let subtotal: Decimal = lines.iter().map(|l| l.amount_ex_gst).sum();
    let gst: Decimal = lines.iter().map(|l| l.gst_amount).sum();
    let total: Decimal = lines.iter().map(|l| l.amount_inc_gst).sum();

    RctiTotals {
        subtotal: round_money(subtotal),
        gst: round_money(gst),
        total: round_money(total),
    }
}
