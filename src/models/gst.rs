//! GST registration status and calculation mode.
//!
//! This module defines the GstStatus and GstMode enums and the validated
//! GstRegime combination used by the line amount calculator.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Whether the payee is registered for GST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstStatus {
    /// The payee is not registered for GST; no GST is charged.
    NotRegistered,
    /// The payee is registered for GST; 10% GST applies per line.
    Registered,
}

/// How a registered payee's rates relate to GST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstMode {
    /// Rates exclude GST; GST is added on top of the line amount.
    Exclusive,
    /// Rates include GST; GST is carved out of the line amount.
    Inclusive,
}

/// A validated GST status/mode combination.
///
/// A registered payee always carries a mode; a non-registered payee never
/// does (the mode is meaningless and any supplied value is discarded).
/// Constructing via [`GstRegime::new`] is the validation boundary for
/// malformed combinations.
///
/// # Example
///
/// ```
/// use rcti_engine::models::{GstMode, GstRegime, GstStatus};
///
/// let regime = GstRegime::new(GstStatus::Registered, Some(GstMode::Exclusive)).unwrap();
/// assert!(regime.is_registered());
///
/// // Registered with no mode is rejected, not defaulted.
/// assert!(GstRegime::new(GstStatus::Registered, None).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstRegime {
    /// No GST applies.
    NotRegistered,
    /// GST applies, calculated per the given mode.
    Registered(GstMode),
}

impl GstRegime {
    /// Builds a regime from a status and optional mode.
    ///
    /// # Arguments
    ///
    /// * `status` - The payee's GST registration status
    /// * `mode` - The GST calculation mode, required when registered
    ///
    /// # Returns
    ///
    /// Returns the validated regime, or `InvalidGstRegime` if the payee is
    /// registered but no mode was supplied. A mode supplied for a
    /// non-registered payee is ignored.
    pub fn new(status: GstStatus, mode: Option<GstMode>) -> EngineResult<Self> {
        match (status, mode) {
            (GstStatus::NotRegistered, _) => Ok(GstRegime::NotRegistered),
            (GstStatus::Registered, Some(mode)) => Ok(GstRegime::Registered(mode)),
            (GstStatus::Registered, None) => Err(EngineError::InvalidGstRegime {
                message: "registered payee requires a GST mode".to_string(),
            }),
        }
    }

    /// Returns true if GST applies under this regime.
    pub fn is_registered(&self) -> bool {
        matches!(self, GstRegime::Registered(_))
    }
}
