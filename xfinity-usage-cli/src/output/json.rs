//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use xfinity_usage_core::{SensorAttributes, SensorState};
use xfinity_usage_fetch::{UsageSensor, UsageSource};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for the sensor.
#[derive(Debug, Serialize)]
pub struct SensorOutput {
    pub name: String,
    pub icon: String,
    pub state: SensorState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_percent: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_datetime_opt"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<SensorAttributes>,
}

impl SensorOutput {
    /// Captures the current sensor values.
    pub fn from_sensor<S: UsageSource>(sensor: &UsageSensor<S>) -> Self {
        let snapshot = sensor.snapshot();
        Self {
            name: sensor.name().to_string(),
            icon: sensor.icon().to_string(),
            state: sensor.state(),
            unit_of_measurement: sensor.unit_of_measurement().map(str::to_string),
            used_percent: snapshot.and_then(xfinity_usage_core::UsageSnapshot::used_percent),
            updated_at: snapshot.map(|s| s.updated_at),
            attributes: sensor.attributes(),
        }
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the sensor.
    pub fn format_sensor<S: UsageSource>(&self, sensor: &UsageSensor<S>) -> Result<String> {
        self.format(&SensorOutput::from_sensor(sensor))
    }
}

// ============================================================================
// Tests
// ============================================================================
