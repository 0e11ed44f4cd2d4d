//! Invoice (RCTI) model and lifecycle.
//!
//! This module defines the InvoiceLine struct and the Rcti struct with its
//! draft / finalised / paid lifecycle. Totals are derived from the line set
//! and recomputed whenever it changes, never hand-edited.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::calculate_rcti_totals;
use crate::error::{EngineError, EngineResult};

/// A single line on an RCTI.
///
/// Lines derived from a real job carry its `source_job_id`; manually entered
/// and synthetic lines (lunch breaks, tolls, fuel levy) carry `None`.
/// `charged_hours` may be negative for deduction lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// The job this line was derived from, if any.
    pub source_job_id: Option<Uuid>,
    /// The truck type the line was priced for.
    pub truck_type: String,
    /// Human-readable line description.
    pub description: String,
    /// Hours charged on this line (negative for deductions).
    pub charged_hours: Decimal,
    /// The hourly rate applied to this line.
    pub rate_per_hour: Decimal,
    /// The line amount excluding GST.
    pub amount_ex_gst: Decimal,
    /// The GST portion of the line amount.
    pub gst_amount: Decimal,
    /// The line amount including GST.
    pub amount_inc_gst: Decimal,
}

/// Lifecycle status of an RCTI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RctiStatus {
    /// Lines and GST configuration are still editable.
    Draft,
    /// Line edits are locked; deduction scheduling has run.
    Finalised,
    /// Payment has been made. Terminal.
    Paid,
}

/// A recipient-created tax invoice for one driver and billing week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rcti {
    /// Unique identifier for the invoice.
    pub id: Uuid,
    /// The contracted driver being paid.
    pub driver_id: Uuid,
    /// The calendar date identifying the billing period.
    pub week_ending: NaiveDate,
    /// Unique human-traceable invoice number.
    pub invoice_number: String,
    /// Lifecycle status.
    pub status: RctiStatus,
    /// Ordered invoice lines.
    pub lines: Vec<InvoiceLine>,
    /// Sum of line ex-GST amounts, rounded once.
    pub subtotal: Decimal,
    /// Sum of line GST amounts, rounded once.
    pub gst: Decimal,
    /// Sum of line inc-GST amounts, rounded once.
    pub total: Decimal,
}

impl Rcti {
    /// Creates a new draft invoice with derived totals.
    pub fn draft(
        driver_id: Uuid,
        week_ending: NaiveDate,
        invoice_number: String,
        lines: Vec<InvoiceLine>,
    ) -> Self {
        let totals = calculate_rcti_totals(&lines);
        Self {
            id: Uuid::new_v4(),
            driver_id,
            week_ending,
            invoice_number,
            status: RctiStatus::Draft,
            lines,
            subtotal: totals.subtotal,
            gst: totals.gst,
            total: totals.total,
        }
    }

    /// Replaces the line set and recomputes totals.
    ///
    /// # Returns
    ///
    /// Returns `InvalidRctiState` unless the invoice is still a draft; the
    /// invoice is left unchanged on error.
    pub fn replace_lines(&mut self, lines: Vec<InvoiceLine>) -> EngineResult<()> {
        if self.status != RctiStatus::Draft {
            return Err(EngineError::InvalidRctiState {
                rcti_id: self.id,
                message: "lines may only be edited while the invoice is a draft".to_string(),
            });
        }

        let totals = calculate_rcti_totals(&lines);
        self.lines = lines;
        self.subtotal = totals.subtotal;
        self.gst = totals.gst;
        self.total = totals.total;
        Ok(())
    }

    /// Finalises the invoice, locking line edits.
    ///
    /// Finalisation is the trigger for deduction scheduling; the caller runs
    /// the scheduler against the store once this succeeds.
    ///
    /// # Returns
    ///
    /// Returns `InvalidRctiState` if the invoice is not a draft or has no
    /// lines; the invoice is left unchanged on error.
    pub fn finalise(&mut self) -> EngineResult<()> {
        if self.status != RctiStatus::Draft {
            return Err(EngineError::InvalidRctiState {
                rcti_id: self.id,
                message: "only a draft invoice can be finalised".to_string(),
            });
        }
        if self.lines.is_empty() {
            return Err(EngineError::InvalidRctiState {
                rcti_id: self.id,
                message: "cannot finalise an invoice with no lines".to_string(),
            });
        }

        self.status = RctiStatus::Finalised;
        Ok(())
    }

    /// Marks a finalised invoice as paid. Terminal.
    pub fn mark_paid(&mut self) -> EngineResult<()> {
        if self.status != RctiStatus::Finalised {
            return Err(EngineError::InvalidRctiState {
                rcti_id: self.id,
                message: "only a finalised invoice can be marked paid".to_string(),
            });
        }

        self.status = RctiStatus::Paid;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn job_line(amount: &str) -> InvoiceLine {
        InvoiceLine {
            source_job_id: Some(Uuid::new_v4()),
            truck_type: "semi".to_string(),
            description: "Depot to Port Botany".to_string(),
            charged_hours: dec("8"),
            rate_per_hour: dec("50.00"),
            amount_ex_gst: dec(amount),
            gst_amount: dec("0"),
            amount_inc_gst: dec(amount),
        }
    }

    fn draft_with_lines(lines: Vec<InvoiceLine>) -> Rcti {
        Rcti::draft(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            "RCTI-20012025-TESTDRIVER".to_string(),
            lines,
        )
    }

    #[test]
    fn test_draft_derives_totals_from_lines() {
        let rcti = draft_with_lines(vec![job_line("400.00"), job_line("150.00")]);

        assert_eq!(rcti.status, RctiStatus::Draft);
        assert_eq!(rcti.subtotal, dec("550.00"));
        assert_eq!(rcti.total, dec("550.00"));
    }

    #[test]
    fn test_replace_lines_recomputes_totals() {
        let mut rcti = draft_with_lines(vec![job_line("400.00")]);

        rcti.replace_lines(vec![job_line("100.00"), job_line("25.50")])
            .unwrap();

        assert_eq!(rcti.subtotal, dec("125.50"));
        assert_eq!(rcti.lines.len(), 2);
    }

    #[test]
    fn test_replace_lines_rejected_after_finalise() {
        let mut rcti = draft_with_lines(vec![job_line("400.00")]);
        rcti.finalise().unwrap();

        let result = rcti.replace_lines(vec![]);
        assert!(matches!(
            result,
            Err(EngineError::InvalidRctiState { .. })
        ));
        assert_eq!(rcti.lines.len(), 1);
        assert_eq!(rcti.subtotal, dec("400.00"));
    }

    #[test]
    fn test_finalise_with_no_lines_rejected() {
        let mut rcti = draft_with_lines(vec![]);

        let result = rcti.finalise();
        assert!(matches!(
            result,
            Err(EngineError::InvalidRctiState { .. })
        ));
        assert_eq!(rcti.status, RctiStatus::Draft);
    }

    #[test]
    fn test_finalise_locks_status() {
        let mut rcti = draft_with_lines(vec![job_line("400.00")]);
        rcti.finalise().unwrap();
        assert_eq!(rcti.status, RctiStatus::Finalised);

        // Finalising twice is a state violation.
        assert!(rcti.finalise().is_err());
    }

    #[test]
    fn test_mark_paid_requires_finalised() {
        let mut rcti = draft_with_lines(vec![job_line("400.00")]);
        assert!(rcti.mark_paid().is_err());

        rcti.finalise().unwrap();
        rcti.mark_paid().unwrap();
        assert_eq!(rcti.status, RctiStatus::Paid);

        // Paid is terminal.
        assert!(rcti.mark_paid().is_err());
    }

    #[test]
    fn test_status_serialization_uses_snake_case() {
        let json = serde_json::to_string(&RctiStatus::Finalised).unwrap();
        assert_eq!(json, "\"finalised\"");
    }

    #[test]
    fn test_line_serialization() {
        let line = InvoiceLine {
            source_job_id: None,
            truck_type: "semi".to_string(),
            description: "Lunch Breaks - semi".to_string(),
            charged_hours: dec("-0.5"),
            rate_per_hour: dec("50.00"),
            amount_ex_gst: dec("-25.00"),
            gst_amount: dec("-2.50"),
            amount_inc_gst: dec("-27.50"),
        };

        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"source_job_id\":null"));
        assert!(json.contains("\"charged_hours\":\"-0.5\""));
        assert!(json.contains("\"description\":\"Lunch Breaks - semi\""));

        let deserialized: InvoiceLine = serde_json::from_str(&json).unwrap();
        assert_eq!(line, deserialized);
    }
}
