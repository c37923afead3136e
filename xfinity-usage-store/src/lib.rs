// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Xfinity Usage Store
//!
//! Settings and credential storage for the Xfinity usage monitor.
//!
//! This crate provides:
//!
//! - **SettingsStore**: display name, username and scan interval, persisted as JSON
//! - **PasswordStore**: account passwords in the system keychain
//! - **resolve_credentials**: command line, then settings file, then keychain
//!
//! ## Usage
//!
//! ```ignore
//! use xfinity_usage_store::{CredentialOverrides, SettingsStore, SystemKeychain, resolve_credentials};
//!
//! let store = SettingsStore::load_default().await;
//! let settings = store.get().await;
//! let credentials = resolve_credentials(&settings, &CredentialOverrides::default(), &SystemKeychain)?;
//! ```

pub mod error;
pub mod keychain;
pub mod persistence;
pub mod settings;

pub use error::StoreError;
pub use keychain::{PasswordStore, SystemKeychain};
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use settings::{
    CredentialOverrides, DEFAULT_NAME, DEFAULT_SCAN_INTERVAL_SECS, LogLevel,
    MIN_SCAN_INTERVAL_SECS, Settings, SettingsStore, resolve_credentials,
};

#[cfg(test)]
mod persistence_tests;
