//! Lunch break deduction derivation.
//!
//! Lunch-break time is unpaid but arrives bundled into a job's charged
//! hours on import; this module carves it back out as negative deduction
//! lines, one per (truck type, rate) group.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{GstRegime, InvoiceLine};

use super::line_amounts::calculate_line_amounts;

/// Returns the charged-hours threshold above which a job earns a break
/// deduction (strictly greater than; exactly 7 hours does not qualify).
pub fn break_eligibility_threshold() -> Decimal {
    Decimal::new(7, 0)
}

/// Derives negative "Lunch Breaks" lines from a set of invoice lines.
///
/// A line qualifies only if it was derived from a real job (`source_job_id`
/// present) and its charged hours exceed [`break_eligibility_threshold`].
/// Qualifying lines are grouped by the composite key (truck type, rate);
/// each group yields one deduction line deducting `driver_break_hours` per
/// qualifying job at the group's rate.
///
/// # Arguments
///
/// * `lines` - The candidate lines (job-derived and otherwise, undifferentiated)
/// * `driver_break_hours` - Hours deducted per qualifying job; zero means
///   the driver takes no unpaid break and no deductions are produced
/// * `regime` - The driver's GST regime, used to price the deduction lines
///
/// # Returns
///
/// Returns the synthesised deduction lines in (truck type, rate) order, or
/// an error if `driver_break_hours` is negative.
pub fn calculate_lunch_break_lines(
    lines: &[InvoiceLine],
    driver_break_hours: Decimal,
    regime: &GstRegime,
) -> EngineResult<Vec<InvoiceLine>> {
    if driver_break_hours < Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: format!("driver break hours cannot be negative: {}", driver_break_hours),
        });
    }
    if driver_break_hours == Decimal::ZERO {
        return Ok(Vec::new());
    }

    // BTreeMap keeps the output ordering deterministic across runs.
    let mut break_hours_by_group: BTreeMap<(String, Decimal), Decimal> = BTreeMap::new();

    for line in lines {
        let eligible =
            line.source_job_id.is_some() && line.charged_hours > break_eligibility_threshold();
        if eligible {
            *break_hours_by_group
                .entry((line.truck_type.clone(), line.rate_per_hour))
                .or_insert(Decimal::ZERO) += driver_break_hours;
        }
    }

    let mut deduction_lines = Vec::with_capacity(break_hours_by_group.len());

    for ((truck_type, rate), total_break_hours) in break_hours_by_group {
        let charged_hours = -total_break_hours;
        let amounts = calculate_line_amounts(charged_hours, rate, regime)?;

        deduction_lines.push(InvoiceLine {
            source_job_id: None,
            description: format!("Lunch Breaks - {}", truck_type),
            truck_type,
            charged_hours,
            rate_per_hour: rate,
            amount_ex_gst: amounts.amount_ex_gst,
            gst_amount: amounts.gst_amount,
            amount_inc_gst: amounts.amount_inc_gst,
        });
    }

    Ok(deduction_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GstMode;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn exclusive() -> GstRegime {
        GstRegime::Registered(GstMode::Exclusive)
    }

    fn job_line(truck_type: &str, hours: &str, rate: &str) -> InvoiceLine {
        line_with_source(Some(Uuid::new_v4()), truck_type, hours, rate)
    }

    fn line_with_source(
        source_job_id: Option<Uuid>,
        truck_type: &str,
        hours: &str,
        rate: &str,
    ) -> InvoiceLine {
        let hours = dec(hours);
        let rate = dec(rate);
        let amounts = calculate_line_amounts(hours, rate, &exclusive()).unwrap();
        InvoiceLine {
            source_job_id,
            truck_type: truck_type.to_string(),
            description: format!("{} run", truck_type),
            charged_hours: hours,
            rate_per_hour: rate,
            amount_ex_gst: amounts.amount_ex_gst,
            gst_amount: amounts.gst_amount,
            amount_inc_gst: amounts.amount_inc_gst,
        }
    }

    /// LB-001: a long job earns one break line
    #[test]
    fn test_long_job_earns_break_line() {
        let lines = vec![job_line("semi", "9", "52.00")];

        let breaks = calculate_lunch_break_lines(&lines, dec("0.5"), &exclusive()).unwrap();

        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].charged_hours, dec("-0.5"));
        assert_eq!(breaks[0].rate_per_hour, dec("52.00"));
        assert_eq!(breaks[0].description, "Lunch Breaks - semi");
        assert_eq!(breaks[0].source_job_id, None);
        assert_eq!(breaks[0].amount_ex_gst, dec("-26.00"));
        assert_eq!(breaks[0].gst_amount, dec("-2.60"));
        assert_eq!(breaks[0].amount_inc_gst, dec("-28.60"));
    }

    /// LB-002: exactly 7 hours does not qualify
    #[test]
    fn test_exactly_seven_hours_does_not_qualify() {
        let lines = vec![job_line("semi", "7", "52.00")];

        let breaks = calculate_lunch_break_lines(&lines, dec("0.5"), &exclusive()).unwrap();

        assert!(breaks.is_empty());
    }

    /// LB-003: just over 7 hours qualifies
    #[test]
    fn test_just_over_seven_hours_qualifies() {
        let lines = vec![job_line("semi", "7.01", "52.00")];

        let breaks = calculate_lunch_break_lines(&lines, dec("0.5"), &exclusive()).unwrap();

        assert_eq!(breaks.len(), 1);
    }

    /// LB-004: manually entered lines never generate a break
    #[test]
    fn test_manual_lines_never_qualify() {
        let lines = vec![line_with_source(None, "semi", "10", "52.00")];

        let breaks = calculate_lunch_break_lines(&lines, dec("0.5"), &exclusive()).unwrap();

        assert!(breaks.is_empty());
    }

    /// LB-005: zero break hours produce nothing regardless of eligibility
    #[test]
    fn test_zero_break_hours_produce_nothing() {
        let lines = vec![job_line("semi", "12", "52.00")];

        let breaks = calculate_lunch_break_lines(&lines, Decimal::ZERO, &exclusive()).unwrap();

        assert!(breaks.is_empty());
    }

    /// LB-006: same truck type, different rates, separate break lines
    #[test]
    fn test_same_truck_different_rates_split_groups() {
        let lines = vec![
            job_line("semi", "9", "52.00"),
            job_line("semi", "8", "55.00"),
        ];

        let breaks = calculate_lunch_break_lines(&lines, dec("0.5"), &exclusive()).unwrap();

        assert_eq!(breaks.len(), 2);
        assert_eq!(breaks[0].rate_per_hour, dec("52.00"));
        assert_eq!(breaks[1].rate_per_hour, dec("55.00"));
        assert_eq!(breaks[0].charged_hours, dec("-0.5"));
        assert_eq!(breaks[1].charged_hours, dec("-0.5"));
    }

    /// LB-007: multiple qualifying jobs in one group accumulate
    #[test]
    fn test_group_accumulates_per_qualifying_job() {
        let lines = vec![
            job_line("semi", "9", "52.00"),
            job_line("semi", "10", "52.00"),
            job_line("semi", "6", "52.00"), // under the threshold
        ];

        let breaks = calculate_lunch_break_lines(&lines, dec("0.5"), &exclusive()).unwrap();

        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].charged_hours, dec("-1.0"));
        assert_eq!(breaks[0].amount_ex_gst, dec("-52.00"));
    }

    /// LB-008: negative break hours are rejected
    #[test]
    fn test_negative_break_hours_rejected() {
        let lines = vec![job_line("semi", "9", "52.00")];

        let result = calculate_lunch_break_lines(&lines, dec("-0.5"), &exclusive());

        assert!(matches!(
            result,
            Err(EngineError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_groups_ordered_by_truck_type_then_rate() {
        let lines = vec![
            job_line("van", "8", "38.75"),
            job_line("semi", "9", "55.00"),
            job_line("semi", "9", "52.00"),
        ];

        let breaks = calculate_lunch_break_lines(&lines, dec("0.5"), &exclusive()).unwrap();

        assert_eq!(breaks.len(), 3);
        assert_eq!(breaks[0].truck_type, "semi");
        assert_eq!(breaks[0].rate_per_hour, dec("52.00"));
        assert_eq!(breaks[1].truck_type, "semi");
        assert_eq!(breaks[1].rate_per_hour, dec("55.00"));
        assert_eq!(breaks[2].truck_type, "van");
    }

    #[test]
    fn test_empty_input_produces_nothing() {
        let breaks = calculate_lunch_break_lines(&[], dec("0.5"), &exclusive()).unwrap();
        assert!(breaks.is_empty());
    }

    #[test]
    fn test_break_eligibility_threshold_is_seven() {
        assert_eq!(break_eligibility_threshold(), dec("7"));
    }
}
