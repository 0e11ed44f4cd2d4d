//! Core data models for the RCTI engine.
//!
//! This module contains all the domain models used throughout the engine.

mod deduction;
mod gst;
mod invoice;
mod job;

pub use deduction::{
    DeductionApplication, DeductionStatus, DeductionType, Frequency, RecurringDeduction,
};
pub use gst::{GstMode, GstRegime, GstStatus};
pub use invoice::{InvoiceLine, Rcti, RctiStatus};
pub use job::CompletedJob;
