//! User settings and credential resolution.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use xfinity_usage_core::{Credentials, Secret};

pub use xfinity_usage_core::DEFAULT_NAME;

use crate::error::StoreError;
use crate::keychain::PasswordStore;
use crate::persistence::{default_settings_path, load_json_or_default, save_json};

/// Default seconds between scheduled refreshes.
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 3600;

/// Shortest scan interval accepted, in seconds.
pub const MIN_SCAN_INTERVAL_SECS: u64 = 60;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sensor display name.
    pub name: String,

    /// Account username.
    pub username: Option<String>,

    /// Account password.
    ///
    /// Only set when a hand-edited file carries one. Saving writes it back
    /// unchanged so that other edits do not drop it.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub password: Option<Secret>,

    /// Seconds between scheduled refreshes.
    pub scan_interval_secs: u64,

    /// Log level used when no `RUST_LOG` or verbosity flag is given.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            username: None,
            password: None,
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Sets the scan interval in seconds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if `secs` is below the minimum.
    pub fn set_scan_interval(&mut self, secs: u64) -> Result<(), StoreError> {
        if secs < MIN_SCAN_INTERVAL_SECS {
            return Err(StoreError::Config(format!(
                "scan interval must be at least {MIN_SCAN_INTERVAL_SECS} seconds, got {secs}"
            )));
        }
        self.scan_interval_secs = secs;
        Ok(())
    }

    /// Returns the scan interval, raised to the minimum if set too low.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(MIN_SCAN_INTERVAL_SECS))
    }
}

#[allow(clippy::ref_option)]
fn serialize_secret<S>(secret: &Option<Secret>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    secret.as_ref().map(Secret::expose).serialize(serializer)
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<Secret>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|p| !p.is_empty()).map(Secret::new))
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl LogLevel {
    /// Returns the `EnvFilter` directive for this level.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Settings held in memory and persisted on demand.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings bound to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from `path`, using defaults if it is missing or invalid.
    pub async fn load(path: PathBuf) -> Self {
        let settings: Settings = load_json_or_default(&path).await;
        debug!(path = %path.display(), user = ?settings.username, "Settings loaded");

        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        }
    }

    /// Returns the file this store saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Applies `f` to the in-memory settings and returns its result.
    ///
    /// Call [`save`](Self::save) to persist.
    pub async fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Settings) -> R,
    {
        let mut settings = self.settings.write().await;
        f(&mut settings)
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

// ============================================================================
// Credential Resolution
// ============================================================================

/// Credentials given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    /// Username override.
    pub username: Option<String>,
    /// Password override.
    pub password: Option<Secret>,
}

/// Resolves the account credentials.
///
/// Each value is taken from the first source that has it: `overrides`, then
/// `settings`, then (password only) the keychain entry for the resolved
/// username. Empty values count as missing.
///
/// # Errors
///
/// Returns `StoreError::MissingCredential` if the username or password is not
/// found anywhere, or `StoreError::Keychain` if the keychain lookup fails.
pub fn resolve_credentials(
    settings: &Settings,
    overrides: &CredentialOverrides,
    keychain: &dyn PasswordStore,
) -> Result<Credentials, StoreError> {
    let username = overrides
        .username
        .as_deref()
        .or(settings.username.as_deref())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(StoreError::MissingCredential("username"))?
        .to_string();

    let inline = overrides
        .password
        .as_ref()
        .or(settings.password.as_ref())
        .filter(|p| !p.is_empty())
        .cloned();

    let password = match inline {
        Some(password) => password,
        None => {
            debug!(user = %username, "Looking up password in keychain");
            keychain
                .get(&username)?
                .ok_or(StoreError::MissingCredential("password"))?
        }
    };

    Ok(Credentials::new(username, password))
}

// ============================================================================
// Tests
// ============================================================================
