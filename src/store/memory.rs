//! In-memory deduction store.
//!
//! Backs the bundled HTTP surface and the test suite. A single mutex held
//! across the whole apply operation makes every apply trivially
//! serialisable, which is exactly the isolation the trait demands of real
//! persistence bindings.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::calculation::{
    AmountOverrides, AppliedCycle, DeductionLedger, plan_deduction_applications,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionApplication, DeductionStatus, RecurringDeduction};

use super::DeductionStore;

/// An application joined to the week-ending of the invoice it was recorded
/// against. A relational store would recover the date with a join; here it
/// is denormalised onto the record.
#[derive(Debug, Clone)]
struct StoredApplication {
    application: DeductionApplication,
    week_ending: NaiveDate,
}

#[derive(Debug, Default)]
struct Inner {
    deductions: HashMap<Uuid, RecurringDeduction>,
    applications: Vec<StoredApplication>,
    invoice_numbers: BTreeSet<String>,
}

/// An in-memory [`DeductionStore`].
#[derive(Debug, Default)]
pub struct InMemoryDeductionStore {
    inner: Mutex<Inner>,
}

impl InMemoryDeductionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| EngineError::StoreError {
            message: "store mutex poisoned".to_string(),
        })
    }

    /// Adds a deduction to the store.
    pub fn insert_deduction(&self, deduction: RecurringDeduction) -> EngineResult<()> {
        let mut inner = self.lock()?;
        inner.deductions.insert(deduction.id, deduction);
        Ok(())
    }

    /// Returns a deduction by id.
    pub fn deduction(&self, deduction_id: Uuid) -> EngineResult<RecurringDeduction> {
        let inner = self.lock()?;
        inner
            .deductions
            .get(&deduction_id)
            .cloned()
            .ok_or(EngineError::DeductionNotFound { deduction_id })
    }

    /// Deletes a deduction.
    ///
    /// # Returns
    ///
    /// Returns `InvalidDeduction` if anything has already been paid against
    /// it; deletion is only allowed while the deduction is untouched.
    pub fn delete_deduction(&self, deduction_id: Uuid) -> EngineResult<()> {
        let mut inner = self.lock()?;
        let deduction = inner
            .deductions
            .get(&deduction_id)
            .ok_or(EngineError::DeductionNotFound { deduction_id })?;

        if !deduction.is_deletable() {
            return Err(EngineError::InvalidDeduction {
                field: "amount_paid".to_string(),
                message: "cannot delete a deduction with recorded payments".to_string(),
            });
        }

        inner.deductions.remove(&deduction_id);
        inner
            .applications
            .retain(|stored| stored.application.deduction_id != deduction_id);
        Ok(())
    }

    /// Returns every application recorded against a deduction.
    pub fn applications_for(&self, deduction_id: Uuid) -> EngineResult<Vec<DeductionApplication>> {
        let inner = self.lock()?;
        Ok(inner
            .applications
            .iter()
            .filter(|stored| stored.application.deduction_id == deduction_id)
            .map(|stored| stored.application.clone())
            .collect())
    }

    fn ledgers_for(inner: &Inner, driver_id: Uuid) -> Vec<DeductionLedger> {
        let mut ledgers: Vec<DeductionLedger> = inner
            .deductions
            .values()
            .filter(|d| d.driver_id == driver_id && d.status == DeductionStatus::Active)
            .cloned()
            .map(|deduction| {
                let history = inner
                    .applications
                    .iter()
                    .filter(|stored| stored.application.deduction_id == deduction.id)
                    .map(|stored| AppliedCycle {
                        week_ending: stored.week_ending,
                        amount: stored.application.amount,
                        applied_at: stored.application.applied_at,
                    })
                    .collect();
                DeductionLedger { deduction, history }
            })
            .collect();

        // HashMap iteration order is arbitrary; keep the plan deterministic.
        ledgers.sort_by_key(|l| (l.deduction.start_date, l.deduction.id));
        ledgers
    }
}

impl DeductionStore for InMemoryDeductionStore {
    fn active_ledgers(&self, driver_id: Uuid) -> EngineResult<Vec<DeductionLedger>> {
        let inner = self.lock()?;
        Ok(Self::ledgers_for(&inner, driver_id))
    }

    fn used_invoice_numbers(&self, prefix: &str) -> EngineResult<Vec<String>> {
        let inner = self.lock()?;
        Ok(inner
            .invoice_numbers
            .iter()
            .filter(|n| n.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn record_invoice_number(&self, number: &str) -> EngineResult<()> {
        let mut inner = self.lock()?;
        if !inner.invoice_numbers.insert(number.to_string()) {
            return Err(EngineError::StoreError {
                message: format!("invoice number already recorded: {}", number),
            });
        }
        Ok(())
    }

    fn apply_deductions_to_rcti(
        &self,
        rcti_id: Uuid,
        driver_id: Uuid,
        week_ending: NaiveDate,
        overrides: &AmountOverrides,
    ) -> EngineResult<Vec<DeductionApplication>> {
        // One guard spans evaluation and commit; nothing interleaves.
        let mut inner = self.lock()?;

        let ledgers = Self::ledgers_for(&inner, driver_id);
        let planned = plan_deduction_applications(&ledgers, week_ending, overrides)?;

        let now = Utc::now();

        // Validate every balance update against a copy before touching the
        // store, so a failure leaves no partial application set behind.
        let mut updated: Vec<RecurringDeduction> = Vec::with_capacity(planned.len());
        for plan in &planned {
            let mut deduction = inner
                .deductions
                .get(&plan.deduction_id)
                .cloned()
                .ok_or(EngineError::DeductionNotFound {
                    deduction_id: plan.deduction_id,
                })?;
            deduction.record_payment(plan.amount, now)?;
            updated.push(deduction);
        }

        let mut created = Vec::with_capacity(planned.len());
        for (plan, deduction) in planned.iter().zip(updated) {
            let application = DeductionApplication {
                id: Uuid::new_v4(),
                deduction_id: plan.deduction_id,
                rcti_id,
                amount: plan.amount,
                applied_at: now,
            };
            inner.applications.push(StoredApplication {
                application: application.clone(),
                week_ending,
            });
            inner.deductions.insert(deduction.id, deduction);
            created.push(application);
        }

        Ok(created)
    }
}
