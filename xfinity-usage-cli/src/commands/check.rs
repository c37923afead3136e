//! Check command - run the login flow once and report each step.

use anyhow::Result;
use serde::Serialize;
use tracing::info;
use xfinity_usage_core::{FetchStage, UsageSnapshot};
use xfinity_usage_fetch::FetchError;
use xfinity_usage_store::SettingsStore;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Steps reported by the check, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStep {
    /// Login token page.
    Token,
    /// Credential POST.
    Login,
    /// Usage API request.
    Usage,
    /// Reading the figures out of the usage JSON.
    Extraction,
}

impl CheckStep {
    const ALL: [CheckStep; 4] = [Self::Token, Self::Login, Self::Usage, Self::Extraction];

    /// Step name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Login => "login",
            Self::Usage => "usage",
            Self::Extraction => "extraction",
        }
    }

    fn of_error(err: &FetchError) -> Self {
        if matches!(err, FetchError::Extraction(_)) {
            return Self::Extraction;
        }
        match err.stage() {
            Some(FetchStage::Login) => Self::Login,
            Some(FetchStage::Usage) => Self::Usage,
            Some(FetchStage::Token) | None => Self::Token,
        }
    }
}

/// Outcome of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step succeeded.
    Ok,
    /// Step failed.
    Failed,
    /// Step was not reached.
    Skipped,
}

/// One line of the report.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: CheckStep,
    pub status: StepStatus,
}

/// Result of a check run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub ok: bool,
    pub steps: Vec<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<UsageSnapshot>,
}

impl CheckReport {
    /// Builds the report for one fetch outcome.
    pub fn from_outcome(outcome: Result<UsageSnapshot, FetchError>) -> Self {
        match outcome {
            Ok(snapshot) => Self {
                ok: true,
                steps: CheckStep::ALL
                    .iter()
                    .map(|&step| StepReport {
                        step,
                        status: StepStatus::Ok,
                    })
                    .collect(),
                error: None,
                error_kind: None,
                snapshot: Some(snapshot),
            },
            Err(err) => {
                let failed = CheckStep::of_error(&err);
                let steps = CheckStep::ALL
                    .iter()
                    .map(|&step| StepReport {
                        step,
                        status: match (step as u8).cmp(&(failed as u8)) {
                            std::cmp::Ordering::Less => StepStatus::Ok,
                            std::cmp::Ordering::Equal => StepStatus::Failed,
                            std::cmp::Ordering::Greater => StepStatus::Skipped,
                        },
                    })
                    .collect();
                Self {
                    ok: false,
                    steps,
                    error: Some(err.to_string()),
                    error_kind: Some(err.kind()),
                    snapshot: None,
                }
            }
        }
    }

    /// The step that failed, if any.
    pub fn failed_step(&self) -> Option<CheckStep> {
        self.steps
            .iter()
            .find(|s| s.status == StepStatus::Failed)
            .map(|s| s.step)
    }
}

/// Runs the check command.
pub async fn run(cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let settings = store.get().await;
    let fetcher = super::fetcher(cli, &settings)?;

    info!(user = fetcher.username(), "Checking login flow");
    let report = CheckReport::from_outcome(fetcher.fetch().await);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_check(&report));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&report)?);
        }
    }

    Ok(if report.ok {
        ExitCode::Success
    } else {
        ExitCode::Error
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use xfinity_usage_core::UsagePolicy;
    use xfinity_usage_fetch::StatusCode;

    fn statuses(report: &CheckReport) -> Vec<StepStatus> {
        report.steps.iter().map(|s| s.status).collect()
    }

    #[test]
    fn test_success_report() {
        let snapshot =
            UsageSnapshot::new(UsagePolicy::from_raw("limited"), "standard", "GB", 850.0, Some(1000.0))
                .unwrap();
        let report = CheckReport::from_outcome(Ok(snapshot));
        assert!(report.ok);
        assert!(report.failed_step().is_none());
        assert_eq!(statuses(&report), vec![StepStatus::Ok; 4]);
    }

    #[test]
    fn test_token_failure_skips_rest() {
        let err = FetchError::Status {
            stage: FetchStage::Token,
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        let report = CheckReport::from_outcome(Err(err));
        assert!(!report.ok);
        assert_eq!(report.failed_step(), Some(CheckStep::Token));
        assert_eq!(
            statuses(&report),
            vec![
                StepStatus::Failed,
                StepStatus::Skipped,
                StepStatus::Skipped,
                StepStatus::Skipped
            ]
        );
        assert_eq!(report.error_kind, Some("status"));
    }

    #[test]
    fn test_bounced_login() {
        let err = FetchError::AuthenticationFailed("bounced".to_string());
        let report = CheckReport::from_outcome(Err(err));
        assert_eq!(report.failed_step(), Some(CheckStep::Login));
        assert_eq!(report.steps[0].status, StepStatus::Ok);
    }

    #[test]
    fn test_extraction_failure() {
        let err = FetchError::Extraction("usageMonths is empty".to_string());
        let report = CheckReport::from_outcome(Err(err));
        assert_eq!(report.failed_step(), Some(CheckStep::Extraction));
        assert_eq!(
            statuses(&report),
            vec![StepStatus::Ok, StepStatus::Ok, StepStatus::Ok, StepStatus::Failed]
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["steps"][3]["step"], "extraction");
        assert_eq!(json["steps"][3]["status"], "failed");
        assert_eq!(json["error_kind"], "extraction");
    }
}
