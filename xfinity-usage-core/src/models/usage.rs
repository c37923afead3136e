//! Usage-related types.
//!
//! This module contains the figures produced by one successful fetch:
//! - [`UsageSnapshot`] - Total, allowance and remaining usage
//! - [`UsagePolicy`] - Capped or unlimited plan

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Raw policy value the provider uses for plans without a data cap.
const UNLIMITED_POLICY: &str = "unlimited";

// ============================================================================
// Usage Policy
// ============================================================================

/// The provider's usage-plan category.
///
/// Only [`UsagePolicy::Unlimited`] is special: every other value is a capped
/// plan and carries an allowance. The raw string is kept so it round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UsagePolicy {
    /// No data cap; allowance and remaining figures do not apply.
    Unlimited,
    /// A capped plan, with the provider's raw policy value.
    Limited(String),
}

impl UsagePolicy {
    /// Classifies a raw policy value from the usage API.
    pub fn from_raw(raw: &str) -> Self {
        if raw == UNLIMITED_POLICY {
            Self::Unlimited
        } else {
            Self::Limited(raw.to_string())
        }
    }

    /// Returns the raw policy value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unlimited => UNLIMITED_POLICY,
            Self::Limited(raw) => raw,
        }
    }

    /// Returns true for plans without a data cap.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

impl From<String> for UsagePolicy {
    fn from(raw: String) -> Self {
        Self::from_raw(&raw)
    }
}

impl From<UsagePolicy> for String {
    fn from(policy: UsagePolicy) -> Self {
        policy.as_str().to_string()
    }
}

impl fmt::Display for UsagePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Usage Snapshot
// ============================================================================

/// The complete set of usage figures from one successful fetch.
///
/// A snapshot is built wholesale and replaces the previous one; nothing is
/// merged across fetches. `allowed_usage` and `remaining_usage` are present
/// only for capped plans, and then `remaining_usage == allowed_usage -
/// total_usage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Data used in the current month.
    pub total_usage: f64,
    /// Monthly allowance (capped plans only).
    pub allowed_usage: Option<f64>,
    /// Allowance left this month, negative when over (capped plans only).
    pub remaining_usage: Option<f64>,
    /// Unit the figures are reported in, e.g. "GB".
    pub unit: String,
    /// Plan category.
    pub policy: UsagePolicy,
    /// Human-readable plan name, capitalized.
    pub policy_name: String,
    /// The usage API body this snapshot was extracted from.
    #[serde(default)]
    pub raw_payload: serde_json::Value,
    /// When this snapshot was produced.
    pub updated_at: DateTime<Utc>,
}

impl UsageSnapshot {
    /// Creates a snapshot, deriving the remaining usage.
    ///
    /// For unlimited plans any allowance is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` when a capped plan has no allowance.
    pub fn new(
        policy: UsagePolicy,
        policy_name: &str,
        unit: impl Into<String>,
        total_usage: f64,
        allowed_usage: Option<f64>,
    ) -> Result<Self, CoreError> {
        let (allowed_usage, remaining_usage) = match (&policy, allowed_usage) {
            (UsagePolicy::Unlimited, _) => (None, None),
            (UsagePolicy::Limited(_), Some(allowed)) => (Some(allowed), Some(allowed - total_usage)),
            (UsagePolicy::Limited(raw), None) => {
                return Err(CoreError::InvalidData(format!(
                    "no allowance for capped policy '{raw}'"
                )));
            }
        };

        Ok(Self {
            total_usage,
            allowed_usage,
            remaining_usage,
            unit: unit.into(),
            policy,
            policy_name: capitalize(policy_name),
            raw_payload: serde_json::Value::Null,
            updated_at: Utc::now(),
        })
    }

    /// Attaches the raw usage API body.
    #[must_use]
    pub fn with_raw_payload(mut self, payload: serde_json::Value) -> Self {
        self.raw_payload = payload;
        self
    }

    /// Returns true for plans without a data cap.
    pub fn is_unlimited(&self) -> bool {
        self.policy.is_unlimited()
    }

    /// Returns the share of the allowance used, in percent.
    ///
    /// `None` for unlimited plans or a zero allowance.
    pub fn used_percent(&self) -> Option<f64> {
        let allowed = self.allowed_usage?;
        if allowed > 0.0 {
            Some(self.total_usage / allowed * 100.0)
        } else {
            None
        }
    }

    /// Returns true if usage exceeds the allowance.
    pub fn is_over_allowance(&self) -> bool {
        self.remaining_usage.is_some_and(|r| r < 0.0)
    }

    /// Returns true if this snapshot is older than `threshold`.
    pub fn is_stale(&self, threshold: Duration) -> bool {
        Utc::now() - self.updated_at > threshold
    }

    /// Checks the allowance invariants.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if allowance fields are present on an
    /// unlimited plan, missing on a capped plan, inconsistent with the total,
    /// or if any figure is not finite.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.total_usage.is_finite() {
            return Err(CoreError::InvalidData(
                "total_usage is not a finite number".to_string(),
            ));
        }

        match (&self.policy, self.allowed_usage, self.remaining_usage) {
            (UsagePolicy::Unlimited, None, None) => Ok(()),
            (UsagePolicy::Unlimited, _, _) => Err(CoreError::InvalidData(
                "unlimited policy must not carry an allowance".to_string(),
            )),
            (UsagePolicy::Limited(_), Some(allowed), Some(remaining)) => {
                if !allowed.is_finite() {
                    return Err(CoreError::InvalidData(
                        "allowed_usage is not a finite number".to_string(),
                    ));
                }
                if remaining == allowed - self.total_usage {
                    Ok(())
                } else {
                    Err(CoreError::InvalidData(format!(
                        "remaining_usage {remaining} != {allowed} - {}",
                        self.total_usage
                    )))
                }
            }
            (UsagePolicy::Limited(raw), _, _) => Err(CoreError::InvalidData(format!(
                "capped policy '{raw}' needs both allowed and remaining usage"
            ))),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Upper-cases the first character and lower-cases the rest.
///
/// `"standard"` and `"STANDARD"` both become `"Standard"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Formats a usage figure without a trailing `.0` for whole numbers.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capped_snapshot_derives_remaining() {
        let snapshot =
            UsageSnapshot::new(UsagePolicy::from_raw("limited"), "standard", "GB", 850.0, Some(1000.0))
                .unwrap();
        assert_eq!(snapshot.allowed_usage, Some(1000.0));
        assert_eq!(snapshot.remaining_usage, Some(150.0));
        assert_eq!(snapshot.policy_name, "Standard");
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_unlimited_snapshot_drops_allowance() {
        let snapshot =
            UsageSnapshot::new(UsagePolicy::Unlimited, "unlimited", "GB", 850.0, Some(1000.0))
                .unwrap();
        assert!(snapshot.allowed_usage.is_none());
        assert!(snapshot.remaining_usage.is_none());
        assert!(snapshot.used_percent().is_none());
    }

    #[test]
    fn test_capped_without_allowance_is_rejected() {
        let result = UsageSnapshot::new(UsagePolicy::from_raw("limited"), "x", "GB", 1.0, None);
        assert!(matches!(result, Err(CoreError::InvalidData(_))));
    }

    #[test]
    fn test_over_allowance() {
        let snapshot =
            UsageSnapshot::new(UsagePolicy::from_raw("limited"), "x", "GB", 1200.0, Some(1000.0))
                .unwrap();
        assert_eq!(snapshot.remaining_usage, Some(-200.0));
        assert!(snapshot.is_over_allowance());
        assert_eq!(snapshot.used_percent(), Some(120.0));
    }

    #[test]
    fn test_validate_catches_tampered_remaining() {
        let mut snapshot =
            UsageSnapshot::new(UsagePolicy::from_raw("limited"), "x", "GB", 10.0, Some(100.0))
                .unwrap();
        snapshot.remaining_usage = Some(1.0);
        assert!(snapshot.validate().is_err());

        snapshot.policy = UsagePolicy::Unlimited;
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_policy_classification() {
        assert!(UsagePolicy::from_raw("unlimited").is_unlimited());
        // Only the exact literal is unlimited
        assert!(!UsagePolicy::from_raw("Unlimited").is_unlimited());
        assert_eq!(UsagePolicy::from_raw("limited").as_str(), "limited");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("standard"), "Standard");
        assert_eq!(capitalize("STANDARD PLAN"), "Standard plan");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(850.0), "850");
        assert_eq!(format_amount(850.5), "850.5");
        assert_eq!(format_amount(-150.0), "-150");
    }

    #[test]
    fn test_fresh_snapshot_is_not_stale() {
        let snapshot = UsageSnapshot::new(UsagePolicy::Unlimited, "x", "GB", 1.0, None).unwrap();
        assert!(!snapshot.is_stale(Duration::hours(1)));
    }
}
