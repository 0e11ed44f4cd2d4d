//! Recurring deduction scheduling.
//!
//! This module decides, per invoice and per active deduction, whether a
//! cycle is due and what to charge. It is the pure half of the scheduler:
//! the store evaluates a driver's ledgers through [`plan_deduction_applications`]
//! and commits the resulting plan atomically.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionStatus, RecurringDeduction};

/// One historical application of a deduction, joined to the week-ending
/// date of the invoice it was recorded against.
///
/// Week-endings are pure calendar dates, so comparisons here are calendar
/// comparisons by construction, never sensitive to the time of day an
/// invoice happened to be finalised.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCycle {
    /// The week-ending date of the invoice the application belongs to.
    pub week_ending: NaiveDate,
    /// The amount charged (zero for a skipped cycle).
    pub amount: Decimal,
    /// When the application was recorded.
    pub applied_at: DateTime<Utc>,
}

/// A deduction together with its full application history.
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionLedger {
    /// The deduction being scheduled.
    pub deduction: RecurringDeduction,
    /// Every application recorded against the deduction so far.
    pub history: Vec<AppliedCycle>,
}

/// Per-deduction amount overrides supplied by the caller.
///
/// A key mapped to `Some(amount)` charges exactly that amount; a key mapped
/// to `None` records a skip application (amount zero) that still advances
/// the schedule. Absent keys take the default charge.
pub type AmountOverrides = HashMap<Uuid, Option<Decimal>>;

/// A charge the scheduler has decided to record.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedApplication {
    /// The deduction to charge.
    pub deduction_id: Uuid,
    /// The amount to charge; zero for an explicit skip.
    pub amount: Decimal,
}

/// Plans the applications due for one invoice finalisation.
///
/// For each ledger, in order:
///
/// 1. Deductions whose start date falls after the target week-ending are
///    not yet started and are passed over.
/// 2. A deduction with an application already recorded for the target
///    week-ending has been processed for this period; it is passed over.
///    This is the idempotency guarantee: reprocessing the same invoice, or
///    another invoice sharing its week-ending, never double-charges.
/// 3. Due-ness is measured in days elapsed since the most recent prior
///    application's week-ending, or since the start date when there is no
///    history. `Once` ignores elapsed days and fires only while it has no
///    history at all.
/// 4. The charge defaults to the per-cycle amount capped at the remaining
///    balance (`Once` charges the full remaining balance). An override of
///    `None` plans a zero-amount skip; an explicit amount must lie within
///    `[0, remaining]` or the whole plan is rejected.
///
/// An active ledger with no remaining balance is an invariant violation and
/// fails the whole plan (`DeductionExhausted`); the scheduler is
/// all-or-nothing per invoice.
///
/// # Arguments
///
/// * `ledgers` - All active deductions for the driver, with full history
/// * `week_ending` - The target invoice's billing week date
/// * `overrides` - Caller-supplied amount overrides, keyed by deduction id
///
/// # Returns
///
/// The applications to record, one per due deduction, in ledger order.
pub fn plan_deduction_applications(
    ledgers: &[DeductionLedger],
    week_ending: NaiveDate,
    overrides: &AmountOverrides,
) -> EngineResult<Vec<PlannedApplication>> {
    let mut planned = Vec::new();

    for ledger in ledgers {
        let deduction = &ledger.deduction;

        if deduction.status != DeductionStatus::Active {
            continue;
        }

        let remaining = deduction.amount_remaining();
        if remaining <= Decimal::ZERO {
            return Err(EngineError::DeductionExhausted {
                deduction_id: deduction.id,
            });
        }

        if deduction.start_date > week_ending {
            continue;
        }

        if ledger.history.iter().any(|c| c.week_ending == week_ending) {
            continue;
        }

        if !is_cycle_due(ledger, week_ending) {
            continue;
        }

        let amount = match overrides.get(&deduction.id) {
            Some(None) => Decimal::ZERO,
            Some(Some(amount)) => {
                if *amount < Decimal::ZERO {
                    return Err(EngineError::InvalidOverride {
                        deduction_id: deduction.id,
                        message: format!("override amount cannot be negative: {}", amount),
                    });
                }
                if *amount > remaining {
                    return Err(EngineError::InvalidOverride {
                        deduction_id: deduction.id,
                        message: format!(
                            "override amount {} exceeds remaining balance {}",
                            amount, remaining
                        ),
                    });
                }
                *amount
            }
            None => match deduction.amount_per_cycle {
                Some(per_cycle) => per_cycle.min(remaining),
                None => remaining,
            },
        };

        planned.push(PlannedApplication {
            deduction_id: deduction.id,
            amount,
        });
    }

    Ok(planned)
}

/// Returns true if the ledger's next cycle is due at the given week-ending.
///
/// The caller has already established that the deduction has started and
/// that no application exists for this exact week-ending.
fn is_cycle_due(ledger: &DeductionLedger, week_ending: NaiveDate) -> bool {
    match ledger.deduction.frequency.cycle_days() {
        // Once: fires on the first-ever application only.
        None => ledger.history.is_empty(),
        Some(cycle_days) => {
            let baseline = ledger
                .history
                .iter()
                .map(|c| c.week_ending)
                .max()
                .unwrap_or(ledger.deduction.start_date);
            (week_ending - baseline).num_days() >= cycle_days
        }
    }
}
