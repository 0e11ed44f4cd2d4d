//! Invoice number generation.
//!
//! This module builds the unique, human-traceable identifier assigned to an
//! invoice at draft creation.

use chrono::NaiveDate;

/// The fixed prefix every invoice number starts with.
pub const INVOICE_NUMBER_PREFIX: &str = "RCTI";

/// The maximum number of payee-name characters carried into the identifier.
pub const PAYEE_SEGMENT_LEN: usize = 10;

/// Builds the base identifier for a (week-ending date, payee) pair.
///
/// The base is `RCTI-DDMMYYYY-NNNNNNNNNN`, where the trailing segment is
/// the first [`PAYEE_SEGMENT_LEN`] alphanumeric characters of the payee's
/// display name, upper-cased, with every other character stripped.
///
/// # Examples
///
/// ```
/// use rcti_engine::calculation::invoice_number_base;
/// use chrono::NaiveDate;
///
/// let base = invoice_number_base(
///     NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
///     "Test Driver",
/// );
/// assert_eq!(base, "RCTI-20012025-TESTDRIVER");
/// ```
pub fn invoice_number_base(week_ending: NaiveDate, payee_name: &str) -> String {
    let payee_segment: String = payee_name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(PAYEE_SEGMENT_LEN)
        .flat_map(char::to_uppercase)
        .collect();

    format!(
        "{}-{}-{}",
        INVOICE_NUMBER_PREFIX,
        week_ending.format("%d%m%Y"),
        payee_segment
    )
}

/// Generates a unique invoice number against a set of already-used numbers.
///
/// If the base identifier is unused it is returned as-is; otherwise `-1`,
/// `-2`, ... are appended until an unused candidate is found. The scan is
/// linear rather than hash-based so results are reproducible and
/// human-traceable. Deterministic given identical inputs.
///
/// The caller supplies the used set scoped to the relevant base (typically
/// a persistence-layer prefix query); a unique constraint in the store
/// remains the backstop under concurrent creation.
///
/// # Arguments
///
/// * `existing` - Invoice numbers already in use
/// * `week_ending` - The invoice's billing week date
/// * `payee_name` - The payee's display name
pub fn generate_invoice_number(
    existing: &[String],
    week_ending: NaiveDate,
    payee_name: &str,
) -> String {
    let base = invoice_number_base(week_ending, payee_name);

    if !existing.iter().any(|n| *n == base) {
        return base;
    }

    let mut suffix = 1u64;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !existing.iter().any(|n| *n == candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
