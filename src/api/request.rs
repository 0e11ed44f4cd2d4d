//! Request types for the RCTI engine API.
//!
//! This module defines the JSON request structures accepted by the HTTP
//! endpoints and their conversions into domain types.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::CompletedJob;

/// A completed job as submitted to the draft endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRequest {
    /// Unique identifier for the job.
    pub id: Uuid,
    /// The truck type the job was run with.
    pub truck_type: String,
    /// Free-text description carried onto the invoice line.
    pub description: String,
    /// Hours charged for the job as imported.
    pub charged_hours: Decimal,
}

impl From<JobRequest> for CompletedJob {
    fn from(request: JobRequest) -> Self {
        CompletedJob {
            id: request.id,
            truck_type: request.truck_type,
            description: request.description,
            charged_hours: request.charged_hours,
        }
    }
}

/// Request body for POST /rctis/draft.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    /// The driver code from the fleet configuration.
    pub driver: String,
    /// The billing week's date.
    pub week_ending: NaiveDate,
    /// The completed jobs grouped into this billing week.
    pub jobs: Vec<JobRequest>,
}

/// Request body for POST /rctis/finalise.
///
/// An override entry of `null` skips that deduction's cycle for this period
/// (a zero-amount application that still advances the schedule).
#[derive(Debug, Clone, Deserialize)]
pub struct FinaliseRequest {
    /// The invoice being finalised.
    pub rcti_id: Uuid,
    /// The driver the invoice pays.
    pub driver_id: Uuid,
    /// The invoice's billing week date.
    pub week_ending: NaiveDate,
    /// Per-deduction amount overrides, keyed by deduction id.
    #[serde(default)]
    pub amount_overrides: HashMap<Uuid, Option<Decimal>>,
}
