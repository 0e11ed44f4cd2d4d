//! Completed job model.
//!
//! This module defines the CompletedJob struct representing one delivery
//! job finished by a contracted driver within a billing week.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed job supplied by the host application for invoicing.
///
/// Jobs arrive already grouped into a billing week; the engine prices them
/// against the driver's rate card but does not decide which jobs belong to
/// which invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedJob {
    /// Unique identifier for the job.
    pub id: Uuid,
    /// The truck type the job was run with (rate card key).
    pub truck_type: String,
    /// Free-text description carried onto the invoice line.
    pub description: String,
    /// Hours charged for the job, as imported (lunch breaks still bundled in).
    pub charged_hours: Decimal,
}
