//! Text output formatting with progress bars and colors.

use chrono::{DateTime, Local};
use std::time::Duration;
use xfinity_usage_core::{SensorAttributes, UsageSnapshot, format_amount};
use xfinity_usage_fetch::{UsageSensor, UsageSource};

use crate::commands::check::{CheckReport, StepStatus};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Formats the sensor state, allowance and plan.
    pub fn format_sensor<S: UsageSource>(&self, sensor: &UsageSensor<S>) -> String {
        let Some(snapshot) = sensor.snapshot() else {
            return format!(
                "{}  {}\n{}",
                self.bold(sensor.name()),
                sensor.state(),
                self.dim("No usage data yet")
            );
        };

        let mut lines = vec![format!(
            "{}  {} {}",
            self.bold(sensor.name()),
            self.cyan(&sensor.state().to_string()),
            snapshot.unit
        )];

        lines.push(self.format_allowance(snapshot));
        lines.push(format!("{:<10} {}", "Plan:", snapshot.policy_name));

        let local = snapshot.updated_at.with_timezone(&Local);
        lines.push(format!(
            "{:<10} {}",
            "Updated:",
            self.dim(&local.format("%Y-%m-%d %H:%M").to_string())
        ));

        lines.join("\n")
    }

    /// Formats the allowance line (and the remaining line for capped plans).
    fn format_allowance(&self, snapshot: &UsageSnapshot) -> String {
        let (Some(allowed), Some(remaining)) = (snapshot.allowed_usage, snapshot.remaining_usage)
        else {
            return format!("{:<10} {}", "Allowance:", self.green("unlimited"));
        };

        let unit = &snapshot.unit;
        let mut result = match snapshot.used_percent() {
            Some(used) => format!(
                "{:<10} {} {}",
                "Allowance:",
                self.progress_bar(used),
                self.color_for_used(used, &format!("{used:.0}% used"))
            ),
            None => format!("{:<10} {}", "Allowance:", self.dim("none")),
        };

        let detail = if snapshot.is_over_allowance() {
            self.red(&format!(
                "{} {unit} over the {} {unit} allowance",
                format_amount(-remaining),
                format_amount(allowed)
            ))
        } else {
            format!(
                "{} {unit} left of {} {unit}",
                format_amount(remaining),
                format_amount(allowed)
            )
        };
        result.push_str(&format!("\n{:<10} {detail}", ""));
        result
    }

    /// Lists every attribute, passthrough fields included.
    pub fn format_attributes(&self, attrs: &SensorAttributes) -> String {
        let mut lines = vec![self.bold("Attributes")];

        let optional = |v: Option<f64>| v.map_or_else(|| "-".to_string(), format_amount);
        lines.push(format!("  attribution: {}", attrs.attribution));
        lines.push(format!("  total_usage: {}", format_amount(attrs.total_usage)));
        lines.push(format!("  allowed_usage: {}", optional(attrs.allowed_usage)));
        lines.push(format!("  remaining_usage: {}", optional(attrs.remaining_usage)));
        lines.push(format!("  policy_name: {}", attrs.policy_name));

        for (key, value) in &attrs.extra {
            lines.push(format!("  {}: {}", key, self.dim(&value.to_string())));
        }

        lines.join("\n")
    }

    /// Formats the header redrawn on every watch tick.
    pub fn format_watch_header(
        &self,
        interval: Duration,
        last_success: Option<DateTime<Local>>,
    ) -> String {
        let last = last_success.map_or_else(
            || self.yellow("never"),
            |t| t.format("%H:%M:%S").to_string(),
        );
        format!(
            "{} - {} (refresh: {}s, last update: {})\n{}",
            self.bold("Xfinity Usage Watch"),
            Local::now().format("%H:%M:%S"),
            interval.as_secs(),
            last,
            "─".repeat(50)
        )
    }

    /// Formats a check report, one step per line.
    pub fn format_check(&self, report: &CheckReport) -> String {
        let mut lines = Vec::new();

        for step in &report.steps {
            let status = match step.status {
                StepStatus::Ok => self.green("✓ ok"),
                StepStatus::Failed => self.red("✗ failed"),
                StepStatus::Skipped => self.dim("− skipped"),
            };
            lines.push(format!("{:<12} {}", step.step.as_str(), status));
        }

        lines.push(String::new());
        match (&report.error, &report.snapshot) {
            (Some(error), _) => lines.push(self.format_error("Check", error)),
            (None, Some(snapshot)) => lines.push(format!(
                "{}: {} {} used ({})",
                self.bold("Check"),
                format_amount(snapshot.total_usage),
                snapshot.unit,
                snapshot.policy_name
            )),
            (None, None) => {}
        }

        lines.join("\n")
    }

    /// Formats a progress bar filled by the share used.
    pub fn progress_bar(&self, percent_used: f64) -> String {
        let clamped = percent_used.clamp(0.0, 100.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let filled = ((clamped / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_used(percent_used, &bar)
    }

    /// Formats an error message.
    pub fn format_error(&self, label: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(label), self.red("Error"), error)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_used(&self, percent_used: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent_used >= 90.0 {
            self.red(text)
        } else if percent_used >= 75.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

// ============================================================================
// Tests
// ============================================================================
