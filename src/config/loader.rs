//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading fleet
//! configurations from YAML files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{DriverProfile, DriversConfig, FleetConfig, FleetMetadata, RateCard};

/// Loads and provides access to fleet configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query drivers and truck-type rates.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/fleet/
/// ├── fleet.yaml        # Fleet metadata
/// ├── drivers.yaml      # Contracted driver profiles
/// └── rates/
///     └── 2025-07-01.yaml  # Rates effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use rcti_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/fleet").unwrap();
///
/// let driver = loader.get_driver("drv_tomkins").unwrap();
/// println!("Driver: {}", driver.name);
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let rate = loader.get_hourly_rate("semi", date).unwrap();
/// println!("Hourly rate: ${}", rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: FleetConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/fleet")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let fleet_path = path.join("fleet.yaml");
        let metadata = Self::load_yaml::<FleetMetadata>(&fleet_path)?;

        let drivers_path = path.join("drivers.yaml");
        let drivers_config = Self::load_yaml::<DriversConfig>(&drivers_path)?;

        let rates_dir = path.join("rates");
        let rate_cards = Self::load_rate_cards(&rates_dir)?;

        let config = FleetConfig::new(metadata, drivers_config.drivers, rate_cards);

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate card files from the rates directory.
    fn load_rate_cards(rates_dir: &Path) -> EngineResult<Vec<RateCard>> {
        let rates_dir_str = rates_dir.display().to_string();

        if !rates_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: rates_dir_str,
            });
        }

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut rate_cards = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let card = Self::load_yaml::<RateCard>(&path)?;
                rate_cards.push(card);
            }
        }

        if rate_cards.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate card files found)", rates_dir_str),
            });
        }

        Ok(rate_cards)
    }

    /// Returns the underlying fleet configuration.
    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Returns the fleet metadata.
    pub fn fleet(&self) -> &FleetMetadata {
        self.config.metadata()
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
    pub fn get_driver(&self, code: &str) -> EngineResult<&DriverProfile> {
        self.config.driver(code)
    }

    /// Gets the hourly rate for a truck type on a given date.
    ///
    /// The method finds the most recent rate card that is effective on or
    /// before the given date.
    pub fn get_hourly_rate(&self, truck_type: &str, date: NaiveDate) -> EngineResult<Decimal> {
        self.config.hourly_rate(truck_type, date)
    }
}
