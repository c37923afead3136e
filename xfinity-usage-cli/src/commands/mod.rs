//! CLI command implementations.

pub mod check;
pub mod config;
pub mod password;
pub mod usage;
pub mod watch;

use anyhow::{Context, Result};
use tracing::debug;
use xfinity_usage_core::{Credentials, Secret};
use xfinity_usage_fetch::{UsageFetcher, UsageSensor};
use xfinity_usage_store::{
    CredentialOverrides, Settings, SettingsStore, SystemKeychain, resolve_credentials,
};

use crate::Cli;

/// Credentials given through flags or the environment.
fn overrides(cli: &Cli) -> CredentialOverrides {
    CredentialOverrides {
        username: cli.username.clone(),
        password: cli.password.as_deref().map(Secret::new),
    }
}

/// Resolves credentials from flags, settings and the keychain.
pub fn credentials(cli: &Cli, settings: &Settings) -> Result<Credentials> {
    Ok(resolve_credentials(settings, &overrides(cli), &SystemKeychain)?)
}

/// Builds a fetcher for the production endpoints.
pub fn fetcher(cli: &Cli, settings: &Settings) -> Result<UsageFetcher> {
    let credentials = credentials(cli, settings)?;
    debug!(user = credentials.username(), "Building usage fetcher");
    UsageFetcher::new(credentials).context("Failed to set up the HTTP session")
}

/// Builds the sensor named by the settings.
pub async fn sensor(cli: &Cli, store: &SettingsStore) -> Result<UsageSensor<UsageFetcher>> {
    let settings = store.get().await;
    let fetcher = fetcher(cli, &settings)?;
    Ok(UsageSensor::new(settings.name, fetcher))
}
