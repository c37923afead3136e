//! Sensor-facing state and attributes.
//!
//! These are the values a host displays for the usage sensor: one numeric
//! state plus a structured set of auxiliary attributes.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use super::usage::{UsageSnapshot, format_amount};

/// Attribution string shown with the sensor attributes.
pub const ATTRIBUTION: &str = "Data provided by Xfinity";

/// Sensor display name used when none is configured.
pub const DEFAULT_NAME: &str = "Xfinity Usage";

/// Attribute keys owned by [`SensorAttributes`]; passthrough fields with
/// these names are dropped.
const RESERVED_KEYS: &[&str] = &[
    "attribution",
    "total_usage",
    "allowed_usage",
    "remaining_usage",
    "policy_name",
];

// ============================================================================
// Sensor State
// ============================================================================

/// The numeric sensor state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SensorState {
    /// Last known total usage.
    Value(f64),
    /// No successful fetch yet.
    #[default]
    Unknown,
}

impl SensorState {
    /// Returns the numeric value, if known.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Unknown => None,
        }
    }

    /// Returns true if no value is known.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<Option<&UsageSnapshot>> for SensorState {
    fn from(snapshot: Option<&UsageSnapshot>) -> Self {
        snapshot.map_or(Self::Unknown, |s| Self::Value(s.total_usage))
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.write_str(&format_amount(*v)),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for SensorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

// ============================================================================
// Sensor Attributes
// ============================================================================

/// Auxiliary attributes published next to the sensor state.
///
/// The five usage fields are typed; every other top-level field of the raw
/// usage payload is passed through in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorAttributes {
    /// Data source attribution.
    pub attribution: String,
    /// Data used this month.
    pub total_usage: f64,
    /// Monthly allowance (capped plans only).
    pub allowed_usage: Option<f64>,
    /// Allowance left (capped plans only).
    pub remaining_usage: Option<f64>,
    /// Capitalized plan name.
    pub policy_name: String,
    /// Remaining provider fields, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SensorAttributes {
    /// Builds the attributes for a snapshot.
    pub fn from_snapshot(snapshot: &UsageSnapshot) -> Self {
        let extra = match &snapshot.raw_payload {
            Value::Object(map) => map
                .iter()
                .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            _ => Map::new(),
        };

        Self {
            attribution: ATTRIBUTION.to_string(),
            total_usage: snapshot.total_usage,
            allowed_usage: snapshot.allowed_usage,
            remaining_usage: snapshot.remaining_usage,
            policy_name: snapshot.policy_name.clone(),
            extra,
        }
    }
}
