//! Persistence seam for the deduction scheduler.
//!
//! The engine is pure computation except for the scheduler, which performs
//! one read-modify-write against shared deduction state. This module owns
//! that seam: the [`DeductionStore`] trait describes what the host's
//! persistence layer must provide, and [`InMemoryDeductionStore`] is the
//! bundled implementation used by the HTTP surface and tests.

mod memory;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::calculation::{AmountOverrides, DeductionLedger};
use crate::error::EngineResult;
use crate::models::DeductionApplication;

pub use memory::InMemoryDeductionStore;

/// Storage operations the deduction scheduler needs from the host.
///
/// The only meaningful race in the engine is concurrent finalisation of two
/// invoices for the same driver. [`DeductionStore::apply_deductions_to_rcti`]
/// must therefore evaluate the full application history and write the new
/// application records inside one transaction with serialisable (or
/// equivalent) isolation scoped to the driver's deductions and
/// applications. Either every qualifying application for the invoice is
/// committed, or none are.
pub trait DeductionStore {
    /// Loads every active deduction for a driver with its full application
    /// history, each application joined to its invoice's week-ending date.
    fn active_ledgers(&self, driver_id: Uuid) -> EngineResult<Vec<DeductionLedger>>;

    /// Returns the invoice numbers already in use that start with the given
    /// prefix.
    ///
    /// Scoping the scan to a prefix keeps number generation a bounded query
    /// rather than a walk over every invoice ever issued; a unique
    /// constraint in the store remains the backstop under concurrent
    /// creation.
    fn used_invoice_numbers(&self, prefix: &str) -> EngineResult<Vec<String>>;

    /// Records an issued invoice number.
    fn record_invoice_number(&self, number: &str) -> EngineResult<()>;

    /// Applies every due deduction for the driver to the given invoice.
    ///
    /// Evaluates due-ness, computes charges (honouring `overrides`),
    /// records one application per due deduction, decrements balances, and
    /// transitions exhausted deductions to completed, all atomically.
    ///
    /// # Arguments
    ///
    /// * `rcti_id` - The invoice being finalised
    /// * `driver_id` - The driver the invoice pays
    /// * `week_ending` - The invoice's billing week date
    /// * `overrides` - Per-deduction amount overrides (`None` = skip)
    ///
    /// # Returns
    ///
    /// The applications created, in deduction order. Calling again with the
    /// same week-ending creates nothing and returns an empty list.
    fn apply_deductions_to_rcti(
        &self,
        rcti_id: Uuid,
        driver_id: Uuid,
        week_ending: NaiveDate,
        overrides: &AmountOverrides,
    ) -> EngineResult<Vec<DeductionApplication>>;
}
