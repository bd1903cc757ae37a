//! Report records, counters, and the outcome of a run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names of the tabular report, in order.
pub const REPORT_COLUMNS: [&str; 6] = [
    "EntryDn",
    "CertificateDn",
    "SerialNumber",
    "ExpiryDate",
    "ExpiryStatus",
    "Days",
];

/// Expiry classification of an effective certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpiryStatus {
    /// Expires after the warning period
    Ok,
    /// Expires within the warning period (inclusive)
    Expiring,
    /// Already expired
    Expired,
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Expiring => write!(f, "EXPIRING"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// One report row, emitted per entry that yields an effective certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(rename = "EntryDn")]
    pub entry_dn: String,
    #[serde(rename = "CertificateDn")]
    pub certificate_dn: String,
    #[serde(rename = "SerialNumber")]
    pub serial_number: String,
    #[serde(rename = "ExpiryDate")]
    pub expiry_date: NaiveDate,
    #[serde(rename = "ExpiryStatus")]
    pub expiry_status: ExpiryStatus,
    #[serde(rename = "Days")]
    pub days_to_expiry: i64,
}

/// Per-run counters.
///
/// Only ever incremented; `expired_count + expiring_count <= certs_written`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Records written to the report
    pub certs_written: u64,
    /// Records classified EXPIRED
    pub expired_count: u64,
    /// Records classified EXPIRING
    pub expiring_count: u64,
}

impl AuditSummary {
    /// Count one emitted record.
    pub fn record(&mut self, status: ExpiryStatus) {
        self.certs_written += 1;
        match status {
            ExpiryStatus::Expired => self.expired_count += 1,
            ExpiryStatus::Expiring => self.expiring_count += 1,
            ExpiryStatus::Ok => {}
        }
    }

    /// Records that are neither expired nor expiring
    #[must_use]
    pub const fn ok_count(&self) -> u64 {
        self.certs_written - self.expired_count - self.expiring_count
    }
}

impl fmt::Display for AuditSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} certs written to the report.", self.certs_written)?;
        writeln!(f, "{} EXPIRED certs.", self.expired_count)?;
        write!(f, "{} EXPIRING certs.", self.expiring_count)
    }
}

/// A search root that could not be enumerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFailure {
    /// The configured search base DN
    pub root: String,
    /// Entries read from this root before it failed
    pub entries_before_failure: u64,
    /// Rendered error
    pub error: String,
}

/// Kind of per-entry problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// One certificate value failed to decode; the entry was still processed
    DecodeError {
        /// Position of the value on the entry
        blob: usize,
        /// Decoder message
        reason: String,
    },
    /// No value on the entry decoded; no record was emitted
    NoCertificateAvailable {
        /// How many values failed to decode
        decode_errors: usize,
    },
    /// The effective certificate expires at or before the epoch; the record
    /// was emitted but the data is suspect
    InvalidExpiry,
}

/// A problem attributed to one directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryIssue {
    /// Distinguished name of the entry
    pub entry_dn: String,
    /// What went wrong
    #[serde(flatten)]
    pub kind: IssueKind,
}

/// Everything a completed run produced besides the report rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOutcome {
    /// Final counters
    pub summary: AuditSummary,
    /// Entries pulled from all roots
    pub entries_processed: u64,
    /// Roots that failed, in configuration order
    pub root_failures: Vec<RootFailure>,
    /// Entry-level problems, in enumeration order
    pub entry_issues: Vec<EntryIssue>,
}

impl AuditOutcome {
    /// Whether the run finished without any logged problem
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.root_failures.is_empty() && self.entry_issues.is_empty()
    }

    /// Count entry issues matching a predicate
    pub fn count_issues(&self, predicate: impl Fn(&IssueKind) -> bool) -> usize {
        self.entry_issues.iter().filter(|i| predicate(&i.kind)).count()
    }
}
