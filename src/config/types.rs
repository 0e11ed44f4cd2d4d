//! Configuration types for the fleet.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{GstMode, GstRegime, GstStatus};

/// Metadata about the fleet.
#[derive(Debug, Clone, Deserialize)]
pub struct FleetMetadata {
    /// The human-readable name of the fleet.
    pub name: String,
    /// The logistics operator issuing RCTIs on the drivers' behalf.
    pub operator: String,
    /// The version or effective date of the configuration.
    pub version: String,
}

/// A contracted driver's invoicing profile.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverProfile {
    /// Unique identifier for the driver.
    pub id: Uuid,
    /// The driver's display name, used to build invoice numbers.
    pub name: String,
    /// Whether the driver is registered for GST.
    pub gst_status: GstStatus,
    /// The GST calculation mode; required when registered.
    #[serde(default)]
    pub gst_mode: Option<GstMode>,
    /// Unpaid lunch-break hours deducted per qualifying job.
    pub break_hours: Decimal,
}

impl DriverProfile {
    /// Builds the driver's validated GST regime.
    pub fn gst_regime(&self) -> EngineResult<GstRegime> {
        GstRegime::new(self.gst_status, self.gst_mode)
    }
}

/// Drivers configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct DriversConfig {
    /// Map of driver code to invoicing profile.
    pub drivers: HashMap<String, DriverProfile>,
}

/// Per-truck-type hourly rates effective from a given date.
#[derive(Debug, Clone, Deserialize)]
pub struct RateCard {
    /// The effective date for these rates.
    pub effective_date: NaiveDate,
    /// Map of truck type to hourly rate.
    pub rates: HashMap<String, Decimal>,
}

/// The complete fleet configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a fleet configuration directory.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Fleet metadata.
    metadata: FleetMetadata,
    /// Contracted drivers by code.
    drivers: HashMap<String, DriverProfile>,
    /// Rate cards by effective date (sorted oldest first).
    rate_cards: Vec<RateCard>,
}

impl FleetConfig {
    /// Creates a new FleetConfig from its component parts.
    ///
    /// Rate cards are sorted by effective date ascending so lookups can
    /// search for the most recent card from the end.
    pub fn new(
        metadata: FleetMetadata,
        drivers: HashMap<String, DriverProfile>,
        mut rate_cards: Vec<RateCard>,
    ) -> Self {
        rate_cards.sort_by_key(|card| card.effective_date);
        Self {
            metadata,
            drivers,
            rate_cards,
        }
    }

    /// Returns the fleet metadata.
    pub fn metadata(&self) -> &FleetMetadata {
        &self.metadata
    }

    /// Returns the drivers map.
    pub fn drivers(&self) -> &HashMap<String, DriverProfile> {
        &self.drivers
    }

    /// Returns the rate cards, sorted oldest first.
    pub fn rate_cards(&self) -> &[RateCard] {
        &self.rate_cards
    }

    /// Gets a driver profile by its code.
    ///
    /// # Arguments
    ///
    /// * `code` - The driver code (e.g., "drv_tomkins")
    ///
    /// # Returns
    ///
    /// Returns the profile if found, or `DriverNotFound` error.
    pub fn driver(&self, code: &str) -> EngineResult<&DriverProfile> {
        self.drivers
            .get(code)
            .ok_or_else(|| EngineError::DriverNotFound {
                code: code.to_string(),
            })
    }

    /// Gets the hourly rate for a truck type on a given date.
    ///
    /// The method finds the most recent rate card that is effective on or
    /// before the given date.
    ///
    /// # Arguments
    ///
    /// * `truck_type` - The truck type (rate card key)
    /// * `date` - The date for which to get the rate
    ///
    /// # Returns
    ///
    /// Returns the hourly rate if found, or `RateNotFound` if no card is
    /// effective for the date or the truck type has no rate on it.
    pub fn hourly_rate(&self, truck_type: &str, date: NaiveDate) -> EngineResult<Decimal> {
        let card = self
            .rate_cards
            .iter()
            .rfind(|card| card.effective_date <= date)
            .ok_or_else(|| EngineError::RateNotFound {
                truck_type: truck_type.to_string(),
                date,
            })?;

        card.rates
            .get(truck_type)
            .copied()
            .ok_or_else(|| EngineError::RateNotFound {
                truck_type: truck_type.to_string(),
                date,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn metadata() -> FleetMetadata {
        FleetMetadata {
            name: "Linehaul Contractor Fleet".to_string(),
            operator: "Harbour Road Logistics".to_string(),
            version: "2025-07-01".to_string(),
        }
    }

    fn card(effective: NaiveDate, semi_rate: &str) -> RateCard {
        let mut rates = HashMap::new();
        rates.insert("semi".to_string(), dec(semi_rate));
        RateCard {
            effective_date: effective,
            rates,
        }
    }

    #[test]
    fn test_rate_cards_sorted_on_construction() {
        let newer = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let older = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let config = FleetConfig::new(
            metadata(),
            HashMap::new(),
            vec![card(newer, "55.00"), card(older, "52.00")],
        );

        assert_eq!(config.rate_cards()[0].effective_date, older);
    }

    #[test]
    fn test_hourly_rate_picks_most_recent_effective_card() {
        let older = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let newer = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let config = FleetConfig::new(
            metadata(),
            HashMap::new(),
            vec![card(older, "52.00"), card(newer, "55.00")],
        );

        let between = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        assert_eq!(config.hourly_rate("semi", between).unwrap(), dec("52.00"));

        let after = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        assert_eq!(config.hourly_rate("semi", after).unwrap(), dec("55.00"));
    }

    #[test]
    fn test_hourly_rate_before_any_card_is_error() {
        let effective = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let config = FleetConfig::new(metadata(), HashMap::new(), vec![card(effective, "52.00")]);

        let early = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(config.hourly_rate("semi", early).is_err());
    }

    #[test]
    fn test_unknown_driver_is_error() {
        let config = FleetConfig::new(metadata(), HashMap::new(), vec![]);
        assert!(matches!(
            config.driver("drv_missing"),
            Err(EngineError::DriverNotFound { .. })
        ));
    }

    #[test]
    fn test_driver_profile_gst_regime_validation() {
        let profile = DriverProfile {
            id: Uuid::new_v4(),
            name: "Alan Tomkins".to_string(),
            gst_status: GstStatus::Registered,
            gst_mode: None,
            break_hours: dec("0.5"),
        };

        assert!(profile.gst_regime().is_err());
    }
}
