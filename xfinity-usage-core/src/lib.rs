// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Xfinity Usage Core
//!
//! Core types and models shared by the Xfinity usage crates.
//!
//! This crate holds the domain model and nothing that touches the network
//! or the filesystem:
//!
//! - Usage data parsed from the provider
//! - Login credentials with a redacted secret
//! - The sensor-facing state and attributes
//! - Error types
//!
//! ## Key Types
//!
//! ### Usage
//! - [`UsageSnapshot`] - Figures produced by one successful fetch
//! - [`UsagePolicy`] - Whether the plan is capped or unlimited
//! - [`FetchStage`] - Which of the three HTTP calls an error belongs to
//!
//! ### Credentials
//! - [`Credentials`] - Username plus password
//! - [`Secret`] - A string that never shows up in logs or serialized output
//!
//! ### Sensor
//! - [`SensorState`] - Numeric state or `unknown`
//! - [`SensorAttributes`] - Auxiliary attributes shown next to the state

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Credentials
    Credentials,
    Secret,
    // Sensor
    ATTRIBUTION,
    DEFAULT_NAME,
    SensorAttributes,
    SensorState,
    // Stage
    FetchStage,
    // Usage
    UsagePolicy,
    UsageSnapshot,
    capitalize,
    format_amount,
};
