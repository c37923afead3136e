//! Domain models.
//!
//! ## Submodules
//!
//! - [`usage`] - Usage figures (UsageSnapshot, UsagePolicy)
//! - [`stage`] - Fetch stages (FetchStage)
//! - [`credentials`] - Login credentials (Credentials, Secret)
//! - [`sensor`] - Sensor-facing state (SensorState, SensorAttributes)

mod credentials;
mod sensor;
mod stage;
mod usage;

// Re-export everything at the models level
pub use credentials::{Credentials, Secret};
pub use sensor::{ATTRIBUTION, DEFAULT_NAME, SensorAttributes, SensorState};
pub use stage::FetchStage;
pub use usage::{UsagePolicy, UsageSnapshot, capitalize, format_amount};
#[cfg(test)]
mod serde_tests;
