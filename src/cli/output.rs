//! Styled operator output
//!
//! Run summaries and final verdicts go to stdout in the same symbols and
//! colours every time. Diagnostics go through `tracing` instead.

use console::style;

use crate::distribute::DistributionOutcome;

/// Output handler for consistent CLI formatting
#[derive(Debug, Default)]
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", style("✔").green(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        println!("\n{}", style(title).bold().underlined());
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        let styled_value = if highlight {
            style(value).green().bold()
        } else {
            style(value).white()
        };
        println!("  {:<12} {}", style(key).dim(), styled_value);
    }

    /// Print one sink's outcome
    pub fn sink(&self, name: &str, outcome: &DistributionOutcome) {
        let (icon, status, detail) = match outcome {
            DistributionOutcome::Delivered(detail) => {
                (style("✓").green().bold(), style("DELIVERED").green(), detail)
            }
            DistributionOutcome::Skipped(reason) => {
                (style("–").dim(), style("SKIPPED").dim(), reason)
            }
            DistributionOutcome::Failed(cause) => {
                (style("✗").red().bold(), style("FAILED").red(), cause)
            }
        };
        println!("{} {:<8} {} {}", icon, name, status.bold(), style(detail).dim());
    }
}
