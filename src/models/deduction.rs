//! Recurring deduction model and lifecycle.
//!
//! This module defines the RecurringDeduction struct, its frequency and
//! status enums, and the DeductionApplication record that makes each
//! billing-period charge idempotent.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Direction of a recurring charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    /// Money withheld from the driver (e.g. equipment rental).
    Deduction,
    /// Money paid back to the driver (e.g. expense reimbursement).
    Reimbursement,
}

/// How often a deduction cycle becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// A single charge, fired on the first qualifying invoice only.
    Once,
    /// Due every 7 days.
    Weekly,
    /// Due every 14 days.
    Fortnightly,
    /// Due every 30 days.
    Monthly,
}

impl Frequency {
    /// Returns the minimum days that must elapse between applications,
    /// or `None` for `Once` (gated on history, not elapsed days).
    pub fn cycle_days(&self) -> Option<i64> {
        match self {
            Frequency::Once => None,
            Frequency::Weekly => Some(7),
            Frequency::Fortnightly => Some(14),
            Frequency::Monthly => Some(30),
        }
    }
}

/// Lifecycle status of a recurring deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionStatus {
    /// The deduction is eligible for scheduling.
    Active,
    /// The full amount has been applied. Terminal.
    Completed,
}

/// A recurring deduction or reimbursement against a driver's invoices.
///
/// The remaining balance is derived as `total_amount - amount_paid` rather
/// than stored, so the balance invariant cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringDeduction {
    /// Unique identifier for the deduction.
    pub id: Uuid,
    /// The driver the deduction is charged against.
    pub driver_id: Uuid,
    /// Whether this withholds from or reimburses the driver.
    pub deduction_type: DeductionType,
    /// The total amount to be applied over the deduction's lifetime.
    pub total_amount: Decimal,
    /// The amount applied so far.
    pub amount_paid: Decimal,
    /// How often a cycle becomes due.
    pub frequency: Frequency,
    /// The amount charged per cycle. Absent for `Once`.
    pub amount_per_cycle: Option<Decimal>,
    /// The first date the deduction may be applied from.
    pub start_date: NaiveDate,
    /// Lifecycle status.
    pub status: DeductionStatus,
    /// When the deduction completed, if it has.
    pub completed_at: Option<DateTime<Utc>>,
}

impl RecurringDeduction {
    /// Creates a new active deduction after validating its shape.
    ///
    /// # Arguments
    ///
    /// * `driver_id` - The driver the deduction belongs to
    /// * `deduction_type` - Deduction or reimbursement
    /// * `total_amount` - Lifetime amount, must be positive
    /// * `frequency` - Cycle cadence
    /// * `amount_per_cycle` - Per-cycle charge; required and positive for
    ///   recurring frequencies, must be absent for `Once`
    /// * `start_date` - First date the deduction may apply from
    ///
    /// # Returns
    ///
    /// Returns the deduction, or `InvalidDeduction` describing the first
    /// malformed field. Nothing is silently coerced.
    pub fn new(
        driver_id: Uuid,
        deduction_type: DeductionType,
        total_amount: Decimal,
        frequency: Frequency,
        amount_per_cycle: Option<Decimal>,
        start_date: NaiveDate,
    ) -> EngineResult<Self> {
        if total_amount <= Decimal::ZERO {
            return Err(EngineError::InvalidDeduction {
                field: "total_amount".to_string(),
                message: "must be positive".to_string(),
            });
        }

        match (frequency, amount_per_cycle) {
            (Frequency::Once, Some(_)) => {
                return Err(EngineError::InvalidDeduction {
                    field: "amount_per_cycle".to_string(),
                    message: "must be absent for a one-off deduction".to_string(),
                });
            }
            (Frequency::Once, None) => {}
            (_, None) => {
                return Err(EngineError::InvalidDeduction {
                    field: "amount_per_cycle".to_string(),
                    message: "required for a recurring frequency".to_string(),
                });
            }
            (_, Some(per_cycle)) if per_cycle <= Decimal::ZERO => {
                return Err(EngineError::InvalidDeduction {
                    field: "amount_per_cycle".to_string(),
                    message: "must be positive".to_string(),
                });
            }
            (_, Some(_)) => {}
        }

        Ok(Self {
            id: Uuid::new_v4(),
            driver_id,
            deduction_type,
            total_amount,
            amount_paid: Decimal::ZERO,
            frequency,
            amount_per_cycle,
            start_date,
            status: DeductionStatus::Active,
            completed_at: None,
        })
    }

    /// Returns the balance still to be applied.
    pub fn amount_remaining(&self) -> Decimal {
        self.total_amount - self.amount_paid
    }

    /// Records a charged amount against the balance.
    ///
    /// Transitions the deduction to `Completed` once the remaining balance
    /// reaches zero. A zero amount (a skipped cycle) is valid and leaves the
    /// balance untouched.
    ///
    /// # Returns
    ///
    /// Returns `InvalidDeduction` if the deduction is not active, the amount
    /// is negative, or the amount exceeds the remaining balance. The
    /// deduction is left unchanged on error.
    pub fn record_payment(&mut self, amount: Decimal, at: DateTime<Utc>) -> EngineResult<()> {
        if self.status != DeductionStatus::Active {
            return Err(EngineError::InvalidDeduction {
                field: "status".to_string(),
                message: "cannot apply a completed deduction".to_string(),
            });
        }
        if amount < Decimal::ZERO {
            return Err(EngineError::InvalidDeduction {
                field: "amount".to_string(),
                message: "applied amount cannot be negative".to_string(),
            });
        }
        if amount > self.amount_remaining() {
            return Err(EngineError::InvalidDeduction {
                field: "amount".to_string(),
                message: "applied amount exceeds remaining balance".to_string(),
            });
        }

        self.amount_paid += amount;
        if self.amount_remaining() == Decimal::ZERO {
            self.status = DeductionStatus::Completed;
            self.completed_at = Some(at);
        }
        Ok(())
    }

    /// Returns true if the deduction may still be deleted.
    ///
    /// Deletion is only allowed while nothing has been paid.
    pub fn is_deletable(&self) -> bool {
        self.amount_paid == Decimal::ZERO
    }
}

/// One historical record of a deduction being charged against, or
/// explicitly skipped for, one invoice.
///
/// The existence of an application for a (deduction, invoice) pair is the
/// unit of idempotency; its amount is zero for a skipped cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionApplication {
    /// Unique identifier for the application.
    pub id: Uuid,
    /// The deduction that was applied.
    pub deduction_id: Uuid,
    /// The invoice the application was recorded against.
    pub rcti_id: Uuid,
    /// The amount charged; zero for an explicitly skipped cycle.
    pub amount: Decimal,
    /// When the application was recorded.
    pub applied_at: DateTime<Utc>,
}
