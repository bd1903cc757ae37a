//! Core types for the audit pipeline.

pub mod certificate;
pub mod entry;
pub mod report;

pub use certificate::Certificate;
pub use entry::DirectoryEntry;
pub use report::{
    AuditOutcome, AuditSummary, EntryIssue, ExpiryStatus, IssueKind, ReportRecord, RootFailure,
    REPORT_COLUMNS,
};
