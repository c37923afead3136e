//! Settings file round-trip and edge case tests.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::persistence::{load_json, load_json_or_default, save_json};
use crate::settings::{LogLevel, Settings, SettingsStore};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("settings.json");

    save_json(&nested_path, &Settings::default()).await.unwrap();
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(result.is_err());

    let fallback: Settings = load_json_or_default(&file_path).await;
    assert_eq!(fallback.name, "Xfinity Usage");
}

#[tokio::test]
async fn test_corrupt_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, "{not json").await.unwrap();

    let settings: Settings = load_json_or_default(&file_path).await;
    assert_eq!(settings.scan_interval_secs, 3600);
}

#[tokio::test]
async fn test_atomic_write_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    save_json(&file_path, &Settings::default()).await.unwrap();

    assert!(file_path.exists());
    assert!(!file_path.with_extension("json.tmp").exists());
}

// ============================================================================
// Settings Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_settings_full_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        name: "Home Internet".to_string(),
        username: Some("alice@example.com".to_string()),
        password: None,
        scan_interval_secs: 900,
        log_level: LogLevel::Debug,
    };

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded.name, "Home Internet");
    assert_eq!(loaded.username.as_deref(), Some("alice@example.com"));
    assert_eq!(loaded.scan_interval_secs, 900);
    assert_eq!(loaded.log_level, LogLevel::Debug);
}

#[tokio::test]
async fn test_no_password_key_without_password() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        username: Some("alice".to_string()),
        ..Settings::default()
    };
    save_json(&file_path, &settings).await.unwrap();

    let raw = tokio::fs::read_to_string(&file_path).await.unwrap();
    assert!(!raw.contains("password"));

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert!(loaded.password.is_none());
    assert_eq!(loaded.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_save_keeps_file_password() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{"username":"alice","password":"hunter2"}"#)
        .await
        .unwrap();

    let store = SettingsStore::load(file_path.clone()).await;
    store.update(|s| s.name = "Home".to_string()).await;
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(file_path).await.get().await;
    assert_eq!(reloaded.name, "Home");
    assert_eq!(reloaded.username.as_deref(), Some("alice"));
    assert_eq!(reloaded.password.map(|p| p.expose().to_string()).as_deref(), Some("hunter2"));
}

#[tokio::test]
async fn test_settings_all_log_levels() {
    let temp_dir = TempDir::new().unwrap();

    for level in [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        let file_path = temp_dir.path().join(format!("settings_{level}.json"));
        let settings = Settings {
            log_level: level,
            ..Settings::default()
        };

        save_json(&file_path, &settings).await.unwrap();
        let loaded: Settings = load_json(&file_path).await.unwrap();
        assert_eq!(loaded.log_level, level);
    }
}

#[tokio::test]
async fn test_store_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(file_path.clone()).await;
    store
        .update(|s| {
            s.username = Some("bob".to_string());
            s.scan_interval_secs = 120;
        })
        .await;
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(file_path).await;
    let settings = reloaded.get().await;
    assert_eq!(settings.username.as_deref(), Some("bob"));
    assert_eq!(settings.scan_interval_secs, 120);
}

// ============================================================================
// Backward Compatibility Tests
// ============================================================================

#[tokio::test]
async fn test_load_minimal_json_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("minimal.json");
    tokio::fs::write(&file_path, "{}").await.unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded.name, "Xfinity Usage");
    assert!(loaded.username.is_none());
    assert_eq!(loaded.scan_interval_secs, 3600);
}

#[tokio::test]
async fn test_load_json_with_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("extra_fields.json");

    let json = r#"{
        "username": "alice",
        "monitored_conditions": ["usage"],
        "nested_unknown": {"key": "value"}
    }"#;
    tokio::fs::write(&file_path, json).await.unwrap();

    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert_eq!(loaded.username.as_deref(), Some("alice"));
}
