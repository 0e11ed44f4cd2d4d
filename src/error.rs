//! Error types for the RCTI engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during invoice computation and
//! deduction scheduling.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the RCTI engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use rcti_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Driver code was not found in the fleet configuration.
    #[error("Driver not found: {code}")]
    DriverNotFound {
        /// The driver code that was not found.
        code: String,
    },

    /// No hourly rate was found for the given truck type and date.
    #[error("Rate not found for truck type '{truck_type}' on date {date}")]
    RateNotFound {
        /// The truck type the rate was requested for.
        truck_type: String,
        /// The date for which the rate was requested.
        date: NaiveDate,
    },

    /// The GST status/mode combination is malformed.
    #[error("Invalid GST regime: {message}")]
    InvalidGstRegime {
        /// A description of what made the combination invalid.
        message: String,
    },

    /// A line was given a negative hourly rate.
    #[error("Rate per hour cannot be negative: {rate}")]
    NegativeRate {
        /// The offending rate.
        rate: Decimal,
    },

    /// A recurring deduction record was invalid or inconsistent.
    #[error("Invalid deduction field '{field}': {message}")]
    InvalidDeduction {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An explicit amount override was out of range for its deduction.
    #[error("Invalid override for deduction {deduction_id}: {message}")]
    InvalidOverride {
        /// The deduction the override targeted.
        deduction_id: Uuid,
        /// A description of what made the override invalid.
        message: String,
    },

    /// An active deduction has no remaining balance to apply.
    #[error("Deduction {deduction_id} has no remaining balance")]
    DeductionExhausted {
        /// The exhausted deduction.
        deduction_id: Uuid,
    },

    /// A deduction was not found in the store.
    #[error("Deduction not found: {deduction_id}")]
    DeductionNotFound {
        /// The deduction id that was not found.
        deduction_id: Uuid,
    },

    /// An invoice was in the wrong state for the requested operation.
    #[error("Invalid invoice state for {rcti_id}: {message}")]
    InvalidRctiState {
        /// The invoice the operation targeted.
        rcti_id: Uuid,
        /// A description of the state violation.
        message: String,
    },

    /// The persistence layer failed during a transactional write.
    #[error("Store error: {message}")]
    StoreError {
        /// A description of the store failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
