//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;
use xfinity_usage_store::{
    PasswordStore, Settings, SettingsStore, SystemKeychain, default_config_dir,
};

use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the sensor display name.
    SetName {
        /// New display name.
        name: String,
    },

    /// Set the account username.
    SetUsername {
        /// Xfinity account username.
        username: String,
    },

    /// Set the scan interval used by `watch`.
    SetInterval {
        /// Seconds between refreshes (at least 60).
        seconds: u64,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show => show_config(cli, store).await?,
        ConfigAction::Path => show_paths(cli, store)?,
        ConfigAction::SetName { name } => set_name(name, store).await?,
        ConfigAction::SetUsername { username } => set_username(username, store).await?,
        ConfigAction::SetInterval { seconds } => set_interval(*seconds, store).await?,
        ConfigAction::Reset => reset_config(store).await?,
    }
    Ok(ExitCode::Success)
}

/// Describes where the password for `settings` would come from.
fn password_source(settings: &Settings, keychain: &dyn PasswordStore) -> &'static str {
    if settings.password.is_some() {
        return "settings file";
    }
    let Some(username) = settings.username.as_deref() else {
        return "not set";
    };
    match keychain.exists(username) {
        Ok(true) => "keychain",
        Ok(false) => "not set",
        Err(_) => "keychain unavailable",
    }
}

/// Settings as shown by `config show`, with the password replaced by its source.
fn settings_json(settings: &Settings, password_source: &str) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(settings)?;
    if let Some(fields) = value.as_object_mut() {
        fields.remove("password");
        fields.insert("password_source".to_string(), password_source.into());
    }
    Ok(value)
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;
    let password = password_source(&settings, &SystemKeychain);

    match cli.format {
        OutputFormat::Text => {
            println!("Xfinity Usage Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Name:          {}", settings.name);
            println!(
                "Username:      {}",
                settings.username.as_deref().unwrap_or("not set")
            );
            println!("Password:      {password}");
            println!("Scan interval: {}s", settings.scan_interval().as_secs());
            println!("Log level:     {}", settings.log_level);
        }
        OutputFormat::Json => {
            let value = settings_json(&settings, password)?;
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&value)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = store.path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_name(name: &str, store: &SettingsStore) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Name must not be empty");
    }

    store.update(|s| s.name = name.to_string()).await;
    store.save().await?;

    info!(name, "Sensor name updated");
    println!("Name set to: {name}");
    Ok(())
}

async fn set_username(username: &str, store: &SettingsStore) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        anyhow::bail!("Username must not be empty");
    }

    store.update(|s| s.username = Some(username.to_string())).await;
    store.save().await?;

    info!(user = username, "Username updated");
    println!("Username set to: {username}");
    Ok(())
}

async fn set_interval(seconds: u64, store: &SettingsStore) -> Result<()> {
    store.update(|s| s.set_scan_interval(seconds)).await?;
    store.save().await?;

    info!(seconds, "Scan interval updated");
    println!("Scan interval set to: {seconds}s");
    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    let path = store.path();

    if tokio::fs::try_exists(path).await? {
        tokio::fs::remove_file(path).await?;
        store.update(|s| *s = Settings::default()).await;
        info!(path = %path.display(), "Settings reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
