//! Fleet configuration for the RCTI engine.
//!
//! Configuration covers the data the engine needs about the operation
//! itself: which drivers are contracted (and how they are taxed), and the
//! per-truck-type hourly rates in force for a given date.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DriverProfile, DriversConfig, FleetConfig, FleetMetadata, RateCard};
