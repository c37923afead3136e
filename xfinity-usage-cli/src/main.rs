// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Xfinity usage CLI - home internet data usage from the command line.
//!
//! # Examples
//!
//! ```bash
//! # One-shot reading (default command)
//! xfinity-usage --username alice@example.com
//!
//! # JSON output
//! xfinity-usage --format json --pretty
//!
//! # Refresh every 30 minutes
//! xfinity-usage watch --interval 1800
//!
//! # Find out which login step fails
//! xfinity-usage check
//!
//! # Store the password in the system keychain
//! xfinity-usage config set-username alice@example.com
//! xfinity-usage password set
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use xfinity_usage_store::{LogLevel, SettingsStore};

use commands::{check, config, password, usage, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// Xfinity usage CLI - home internet data usage monitoring.
#[derive(Parser)]
#[command(name = "xfinity-usage")]
#[command(about = "Xfinity home internet data usage sensor")]
#[command(long_about = r#"
Logs in to the Xfinity customer portal and reports this month's home
internet data usage: total used, the monthly allowance, and what is left.

Credentials are taken from --username/--password (or XFINITY_USERNAME and
XFINITY_PASSWORD), then from the settings file, then from the system keychain.

Examples:
  xfinity-usage                        # Current usage
  xfinity-usage --format json          # JSON output
  xfinity-usage watch                  # Refresh on the configured interval
  xfinity-usage check                  # Diagnose the login flow
  xfinity-usage password set           # Save the password to the keychain
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'usage' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Xfinity account username.
    #[arg(long, short, env = "XFINITY_USERNAME", global = true)]
    pub username: Option<String>,

    /// Xfinity account password.
    #[arg(long, env = "XFINITY_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Settings file to use instead of the default location.
    #[arg(long, env = "XFINITY_USAGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch current usage (default if no command specified).
    #[command(visible_alias = "u")]
    Usage(usage::UsageArgs),

    /// Refresh usage on a fixed interval.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Run the login flow once and report which step fails.
    Check,

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// Manage the keychain password.
    Password(password::PasswordArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error, including a failed check.
    Error = 1,
    /// The sensor has no value after updating.
    NoData = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn log_filter(verbose: bool, level: LogLevel) -> EnvFilter {
    if verbose {
        return EnvFilter::new("xfinity_usage=debug,info");
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("xfinity_usage={}", level.as_filter())))
}

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(log_filter(verbose, level))
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = match &cli.config {
        Some(path) => SettingsStore::load(path.clone()).await,
        None => SettingsStore::load_default().await,
    };
    setup_logging(cli.verbose, cli.quiet, store.get().await.log_level);

    let result = match &cli.command {
        Some(Commands::Usage(args)) => usage::run(args, &cli, &store).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli, &store).await,
        Some(Commands::Check) => check::run(&cli, &store).await,
        Some(Commands::Config(args)) => config::run(args, &cli, &store).await,
        Some(Commands::Password(args)) => password::run(args, &cli, &store).await,
        None => {
            // Default to usage command
            usage::run(&usage::UsageArgs::default(), &cli, &store).await
        }
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::Error
        }
    };

    if code != ExitCode::Success {
        std::process::exit(code as i32);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_usage() {
        let cli = Cli::try_parse_from(["xfinity-usage", "--username", "alice"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.username.as_deref(), Some("alice"));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_watch_interval_flag() {
        let cli = Cli::try_parse_from(["xfinity-usage", "watch", "--interval", "120"]).unwrap();
        match cli.command {
            Some(Commands::Watch(args)) => assert_eq!(args.interval, Some(120)),
            _ => panic!("expected watch"),
        }
    }
}
