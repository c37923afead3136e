//! Usage sensor.
//!
//! Thin presentation layer over a [`UsageSource`]: a name, an icon, one
//! numeric state and a set of attributes. The host decides when to call
//! [`UsageSensor::update`].

use xfinity_usage_core::{SensorAttributes, SensorState, UsageSnapshot};

pub use xfinity_usage_core::DEFAULT_NAME;

use crate::source::UsageSource;

/// Icon shown next to the sensor.
pub const DEFAULT_ICON: &str = "mdi:network";

/// A named usage sensor backed by a source.
#[derive(Debug)]
pub struct UsageSensor<S> {
    name: String,
    icon: &'static str,
    source: S,
}

impl<S: UsageSource> UsageSensor<S> {
    /// Creates a sensor.
    pub fn new(name: impl Into<String>, source: S) -> Self {
        Self {
            name: name.into(),
            icon: DEFAULT_ICON,
            source,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Icon identifier.
    pub fn icon(&self) -> &str {
        self.icon
    }

    /// Last known total usage, or unknown.
    pub fn state(&self) -> SensorState {
        SensorState::from(self.source.snapshot())
    }

    /// Unit of the state, once known.
    pub fn unit_of_measurement(&self) -> Option<&str> {
        self.source.snapshot().map(|s| s.unit.as_str())
    }

    /// Auxiliary attributes, once known.
    pub fn attributes(&self) -> Option<SensorAttributes> {
        self.source.snapshot().map(SensorAttributes::from_snapshot)
    }

    /// The snapshot behind the current state.
    pub fn snapshot(&self) -> Option<&UsageSnapshot> {
        self.source.snapshot()
    }

    /// Refreshes the source. Returns true if new data arrived.
    pub async fn update(&mut self) -> bool {
        self.source.refresh().await
    }
}
