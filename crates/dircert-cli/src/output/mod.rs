//! Console output.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use colored::Colorize;
use dircert_core::{
    AuditOutcome, AuditSummary, ExpiryStatus, ReportError, ReportRecord, ReportSink,
};
use serde::{Deserialize, Serialize};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Summary lines with colors
    #[default]
    Pretty,
    /// The full run outcome as JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

fn paint_status(status: ExpiryStatus) -> String {
    let label = status.to_string();
    match status {
        ExpiryStatus::Expired => label.red().bold().to_string(),
        ExpiryStatus::Expiring => label.yellow().bold().to_string(),
        ExpiryStatus::Ok => label.green().to_string(),
    }
}

/// Print the end-of-run summary.
pub fn print_outcome(outcome: &AuditOutcome, report: &Path, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        OutputFormat::Pretty => {
            let summary = &outcome.summary;
            println!("{} certs written to the report.", summary.certs_written);
            let expired = format!("{} EXPIRED certs.", summary.expired_count);
            let expiring = format!("{} EXPIRING certs.", summary.expiring_count);
            if summary.expired_count > 0 {
                println!("{}", expired.red().bold());
            } else {
                println!("{expired}");
            }
            if summary.expiring_count > 0 {
                println!("{}", expiring.yellow().bold());
            } else {
                println!("{expiring}");
            }

            if !outcome.root_failures.is_empty() {
                println!(
                    "{} {} search base(s) could not be read:",
                    "Warning:".yellow().bold(),
                    outcome.root_failures.len()
                );
                for failure in &outcome.root_failures {
                    println!("  {} {}", failure.root.cyan(), failure.error.dimmed());
                }
            }
            if !outcome.entry_issues.is_empty() {
                println!(
                    "{} {} entry problem(s) logged.",
                    "Note:".dimmed(),
                    outcome.entry_issues.len()
                );
            }
            println!("{} {}", "Report:".bold(), report.display());
        }
    }

    Ok(())
}

/// One-line rendering of a record for `-v`.
pub fn format_record(record: &ReportRecord) -> String {
    format!(
        "{:>8}  {}  {:>6}d  {}",
        paint_status(record.expiry_status),
        record.expiry_date,
        record.days_to_expiry,
        record.entry_dn
    )
}

/// Passes rows through to `inner`, echoing each one to stdout when enabled.
pub struct EchoSink<S> {
    inner: S,
    echo: bool,
}

impl<S: ReportSink> EchoSink<S> {
    pub const fn new(inner: S, echo: bool) -> Self {
        Self { inner, echo }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ReportSink> ReportSink for EchoSink<S> {
    fn begin(&mut self) -> Result<(), ReportError> {
        self.inner.begin()
    }

    fn write_record(&mut self, record: &ReportRecord) -> Result<(), ReportError> {
        self.inner.write_record(record)?;
        if self.echo {
            println!("{}", format_record(record));
        }
        Ok(())
    }

    fn finish(&mut self, summary: &AuditSummary) -> Result<(), ReportError> {
        self.inner.finish(summary)
    }
}

/// Short message for an aborted run. Details go to the log.
pub fn print_fatal(error: &anyhow::Error) {
    eprintln!("{} {error}", "Error:".red().bold());
    eprintln!("Check the log for more details (run with -v, or set --log-file).");
}
