//! Boundary traits for the collaborators around the audit engine.

use std::path::Path;

use crate::error::{NotifyError, ReportError, SourceError};
use crate::types::{AuditSummary, DirectoryEntry, ReportRecord};

/// Lazy stream of entries under one search root.
pub type EntryStream<'a> = Box<dyn Iterator<Item = Result<DirectoryEntry, SourceError>> + 'a>;

/// Produces the certificate-bearing entries under a search root.
///
/// Each call to [`search`](EntrySource::search) starts a fresh enumeration;
/// a stream is not expected to be restartable once it has begun. Streams
/// must enumerate every matching entry (paging internally when needed).
pub trait EntrySource {
    /// Start enumerating entries under `root`.
    fn search(&mut self, root: &str) -> Result<EntryStream<'_>, SourceError>;
}

/// Append-only destination for report rows.
pub trait ReportSink {
    /// Start a fresh report: discard previous content and write the header.
    fn begin(&mut self) -> Result<(), ReportError>;

    /// Append one row.
    fn write_record(&mut self, record: &ReportRecord) -> Result<(), ReportError>;

    /// Called once after the last row with the final counters.
    fn finish(&mut self, summary: &AuditSummary) -> Result<(), ReportError>;
}

impl<T: ReportSink + ?Sized> ReportSink for &mut T {
    fn begin(&mut self) -> Result<(), ReportError> {
        (**self).begin()
    }

    fn write_record(&mut self, record: &ReportRecord) -> Result<(), ReportError> {
        (**self).write_record(record)
    }

    fn finish(&mut self, summary: &AuditSummary) -> Result<(), ReportError> {
        (**self).finish(summary)
    }
}

/// Delivers the finished report to people.
pub trait Notifier {
    /// Send one message, optionally attaching a file.
    fn deliver(
        &self,
        subject: &str,
        body: &str,
        attachment: Option<&Path>,
    ) -> Result<(), NotifyError>;
}
