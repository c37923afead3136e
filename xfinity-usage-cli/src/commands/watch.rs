//! Watch command - refresh the sensor on a fixed interval.

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::Args;
use std::io::{Write, stdout};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};
use xfinity_usage_fetch::{UsageSensor, UsageSource};
use xfinity_usage_store::{MIN_SCAN_INTERVAL_SECS, SettingsStore};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds (defaults to the configured scan interval).
    #[arg(long, short)]
    pub interval: Option<u64>,
}

/// Picks the refresh interval, never below the minimum.
fn refresh_interval(requested: Option<u64>, configured: Duration) -> Duration {
    match requested {
        Some(secs) if secs < MIN_SCAN_INTERVAL_SECS => {
            warn!(requested = secs, min = MIN_SCAN_INTERVAL_SECS, "Interval too short, using minimum");
            Duration::from_secs(MIN_SCAN_INTERVAL_SECS)
        }
        Some(secs) => Duration::from_secs(secs),
        None => configured,
    }
}

/// Updates the sensor, or returns `None` if `shutdown` completes first.
async fn update_until<S, F>(sensor: &mut UsageSensor<S>, shutdown: F) -> Option<bool>
where
    S: UsageSource,
    F: Future,
{
    tokio::select! {
        updated = sensor.update() => Some(updated),
        _ = shutdown => None,
    }
}

/// Runs the watch command until interrupted.
pub async fn run(args: &WatchArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let settings = store.get().await;
    let period = refresh_interval(args.interval, settings.scan_interval());
    let mut sensor = super::sensor(cli, store).await?;

    info!(interval = period.as_secs(), name = sensor.name(), "Starting watch mode");

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_success: Option<DateTime<Local>> = None;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        // The first tick completes immediately
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        match update_until(&mut sensor, &mut shutdown).await {
            Some(true) => last_success = Some(Local::now()),
            Some(false) => {}
            None => break,
        }

        match cli.format {
            OutputFormat::Text => {
                // Clear screen
                print!("\x1b[2J\x1b[H");
                stdout().flush()?;

                let formatter = TextFormatter::new(!cli.no_color);
                println!("{}", formatter.format_watch_header(period, last_success));
                println!();
                println!("{}", formatter.format_sensor(&sensor));
                println!();
                println!("Press Ctrl+C to exit");
            }
            OutputFormat::Json => {
                // One document per line
                println!("{}", JsonFormatter::new(false).format_sensor(&sensor)?);
            }
        }
    }

    info!("Watch mode stopped");
    Ok(ExitCode::Success)
}
