//! Usage command - one update, then print the sensor.

use anyhow::Result;
use clap::Args;
use tracing::info;
use xfinity_usage_fetch::{UsageSensor, UsageSource};
use xfinity_usage_store::SettingsStore;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the usage command.
#[derive(Args, Default)]
pub struct UsageArgs {
    /// Also list the passthrough attributes from the usage API.
    #[arg(long, short)]
    pub attributes: bool,
}

/// Runs the usage command.
pub async fn run(args: &UsageArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let mut sensor = super::sensor(cli, store).await?;

    info!(name = sensor.name(), "Updating sensor");
    sensor.update().await;

    print_sensor(&sensor, args.attributes, cli)?;

    Ok(exit_code(&sensor))
}

/// Exit code for a sensor after its update.
fn exit_code<S: UsageSource>(sensor: &UsageSensor<S>) -> ExitCode {
    if sensor.state().is_unknown() {
        ExitCode::NoData
    } else {
        ExitCode::Success
    }
}

/// Prints the sensor in the selected format.
pub fn print_sensor<S: UsageSource>(
    sensor: &UsageSensor<S>,
    attributes: bool,
    cli: &Cli,
) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_sensor(sensor));
            if attributes {
                if let Some(attrs) = sensor.attributes() {
                    println!();
                    println!("{}", formatter.format_attributes(&attrs));
                }
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_sensor(sensor)?);
        }
    }
    Ok(())
}
