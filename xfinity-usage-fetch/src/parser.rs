//! Usage API response parser.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use xfinity_usage_core::{FetchStage, UsagePolicy, UsageSnapshot};

use crate::error::FetchError;

/// Fields read from the most recent `usageMonths` entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMonth {
    policy: String,
    policy_name: String,
    unit_of_measure: String,
    home_usage: f64,
    /// Only read for capped plans, so its type is checked lazily.
    #[serde(default)]
    allowable_usage: Option<Value>,
}

/// Parses the usage API body as JSON.
///
/// # Errors
///
/// Returns `FetchError::Parse` for the usage stage if the body is not JSON.
pub fn parse_usage_body(body: &str) -> Result<Value, FetchError> {
    debug!(len = body.len(), "Parsing usage response");

    serde_json::from_str(body).map_err(|e| FetchError::Parse {
        stage: FetchStage::Usage,
        detail: format!("Invalid JSON: {e}"),
    })
}

/// Builds a snapshot from the most recent entry of `usageMonths`.
///
/// Entries are assumed to be in chronological order; older entries are not
/// inspected at all.
///
/// # Errors
///
/// Returns `FetchError::Extraction` when `usageMonths` is missing or empty,
/// when a field of the latest entry is missing or mistyped, or when a capped
/// plan has no numeric `allowableUsage`.
pub fn extract_snapshot(payload: Value) -> Result<UsageSnapshot, FetchError> {
    let month = latest_month(&payload)?;
    let policy = UsagePolicy::from_raw(&month.policy);

    let allowed_usage = if policy.is_unlimited() {
        None
    } else {
        let allowed = month
            .allowable_usage
            .as_ref()
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                FetchError::Extraction(format!(
                    "allowableUsage missing or not a number for policy '{policy}'"
                ))
            })?;
        Some(allowed)
    };

    let snapshot = UsageSnapshot::new(
        policy,
        &month.policy_name,
        month.unit_of_measure,
        month.home_usage,
        allowed_usage,
    )
    .map_err(|e| FetchError::Extraction(e.to_string()))?;

    debug!(
        total = snapshot.total_usage,
        allowed = ?snapshot.allowed_usage,
        unit = %snapshot.unit,
        policy = %snapshot.policy,
        "Extracted usage snapshot"
    );

    Ok(snapshot.with_raw_payload(payload))
}

fn latest_month(payload: &Value) -> Result<UsageMonth, FetchError> {
    let months = payload
        .get("usageMonths")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Extraction("usageMonths array not found".to_string()))?;

    let latest = months
        .last()
        .ok_or_else(|| FetchError::Extraction("usageMonths is empty".to_string()))?;

    UsageMonth::deserialize(latest)
        .map_err(|e| FetchError::Extraction(format!("latest usage month: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
