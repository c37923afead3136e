//! Password command - manage the keychain entry for the account.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::io::{BufRead, Write};
use tracing::info;
use xfinity_usage_core::Secret;
use xfinity_usage_store::{PasswordStore, SettingsStore, StoreError, SystemKeychain};

use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the password command.
#[derive(Args)]
pub struct PasswordArgs {
    #[command(subcommand)]
    pub action: PasswordAction,
}

/// Password subcommands.
#[derive(Subcommand)]
pub enum PasswordAction {
    /// Store the password (from --password, XFINITY_PASSWORD, or stdin).
    Set,

    /// Remove the stored password.
    Delete,

    /// Show whether a password is stored.
    Status,
}

/// Runs the password command.
pub async fn run(args: &PasswordArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let settings = store.get().await;
    let username = cli
        .username
        .as_deref()
        .or(settings.username.as_deref())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(StoreError::MissingCredential("username"))?;

    let keychain = SystemKeychain;
    match args.action {
        PasswordAction::Set => {
            let password = match cli.password.as_deref() {
                Some(p) => Secret::new(p),
                None => read_password(username)?,
            };
            if password.is_empty() {
                anyhow::bail!("Password must not be empty");
            }
            keychain.set(username, &password)?;
            info!(user = username, "Password stored");
            println!("Password stored in keychain for {username}");
        }
        PasswordAction::Delete => {
            keychain.delete(username)?;
            info!(user = username, "Password deleted");
            println!("Password removed from keychain for {username}");
        }
        PasswordAction::Status => {
            let stored = keychain.exists(username)?;
            match cli.format {
                OutputFormat::Text => {
                    let state = if stored { "stored" } else { "not stored" };
                    println!("Password for {username}: {state}");
                }
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({"username": username, "stored": stored})
                    );
                }
            }
        }
    }

    Ok(ExitCode::Success)
}

/// Reads one line from stdin, prompting on stderr.
fn read_password(username: &str) -> Result<Secret> {
    eprint!("Password for {username}: ");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    Ok(Secret::new(line.trim_end_matches(['\r', '\n'])))
}
