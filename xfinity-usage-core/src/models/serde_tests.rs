//! Serde serialization/deserialization tests for core types.

use serde_json::json;

use crate::{FetchStage, SensorState, UsagePolicy, UsageSnapshot};

// ============================================================================
// UsagePolicy Serde Tests
// ============================================================================

#[test]
fn test_policy_serializes_as_raw_string() {
    assert_eq!(serde_json::to_string(&UsagePolicy::Unlimited).unwrap(), r#""unlimited""#);
    assert_eq!(
        serde_json::to_string(&UsagePolicy::Limited("limited".to_string())).unwrap(),
        r#""limited""#
    );
}

#[test]
fn test_policy_deserializes_from_raw_string() {
    let policy: UsagePolicy = serde_json::from_str(r#""unlimited""#).unwrap();
    assert_eq!(policy, UsagePolicy::Unlimited);

    let policy: UsagePolicy = serde_json::from_str(r#""1TB""#).unwrap();
    assert_eq!(policy, UsagePolicy::Limited("1TB".to_string()));
}

// ============================================================================
// FetchStage Serde Tests
// ============================================================================

#[test]
fn test_fetch_stage_lowercase() {
    for stage in FetchStage::all() {
        let json = serde_json::to_string(stage).unwrap();
        assert_eq!(json, format!("\"{}\"", stage.as_str()));
        let parsed: FetchStage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, *stage);
    }
}

// ============================================================================
// SensorState Serde Tests
// ============================================================================

#[test]
fn test_sensor_state_serialization() {
    assert_eq!(serde_json::to_value(SensorState::Value(850.0)).unwrap(), json!(850.0));
    assert_eq!(serde_json::to_value(SensorState::Unknown).unwrap(), json!("unknown"));
}

// ============================================================================
// UsageSnapshot Serde Tests
// ============================================================================

#[test]
fn test_snapshot_json_field_names() {
    let snapshot = UsageSnapshot::new(UsagePolicy::from_raw("limited"), "standard", "GB", 850.0, Some(1000.0))
        .unwrap()
        .with_raw_payload(json!({"usageMonths": []}));

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["policy"], json!("limited"));
    assert_eq!(value["policy_name"], json!("Standard"));
    assert_eq!(value["remaining_usage"], json!(150.0));
    assert_eq!(value["raw_payload"]["usageMonths"], json!([]));
}

#[test]
fn test_snapshot_deserialize_without_payload() {
    let json = r#"{
        "total_usage": 10.0,
        "allowed_usage": null,
        "remaining_usage": null,
        "unit": "GB",
        "policy": "unlimited",
        "policy_name": "Unlimited",
        "updated_at": "2026-01-01T00:00:00Z"
    }"#;
    let snapshot: UsageSnapshot = serde_json::from_str(json).unwrap();
    assert!(snapshot.is_unlimited());
    assert!(snapshot.raw_payload.is_null());
    assert!(snapshot.validate().is_ok());
}
