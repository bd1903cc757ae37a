//! CSV report sink.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use dircert_core::{AuditSummary, ReportError, ReportRecord, ReportSink, REPORT_COLUMNS};
use tracing::debug;

/// Default report file name
pub const DEFAULT_REPORT_FILENAME: &str = "certificates.csv";

/// Writes report rows as UTF-8 CSV, flushing after every row.
///
/// A partially written report is left in place if the run aborts.
pub struct CsvReportSink<W: Write = File> {
    writer: csv::Writer<W>,
    path: Option<PathBuf>,
    started: bool,
    rows: u64,
}

impl CsvReportSink<File> {
    /// Create (or truncate) the report file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let path = path.into();
        debug!(path = %path.display(), "starting fresh report file");
        let file = File::create(&path).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;

        let mut sink = Self::from_writer(file);
        sink.path = Some(path);
        Ok(sink)
    }
}

impl<W: Write> CsvReportSink<W> {
    /// Report into an arbitrary writer.
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer),
            path: None,
            started: false,
            rows: 0,
        }
    }

    /// The report file, if file-backed
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Rows written so far
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, ReportError> {
        self.writer
            .into_inner()
            .map_err(|e| ReportError::Csv(e.error().to_string()))
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        self.writer.flush().map_err(|source| match &self.path {
            Some(path) => ReportError::Io {
                path: path.clone(),
                source,
            },
            None => ReportError::Csv(source.to_string()),
        })
    }
}

impl<W: Write> ReportSink for CsvReportSink<W> {
    fn begin(&mut self) -> Result<(), ReportError> {
        if !self.started {
            self.writer
                .write_record(REPORT_COLUMNS)
                .map_err(|e| ReportError::Csv(e.to_string()))?;
            self.started = true;
        }
        self.flush()
    }

    fn write_record(&mut self, record: &ReportRecord) -> Result<(), ReportError> {
        if !self.started {
            return Err(ReportError::NotStarted);
        }
        self.writer
            .serialize(record)
            .map_err(|e| ReportError::Csv(e.to_string()))?;
        self.flush()?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self, summary: &AuditSummary) -> Result<(), ReportError> {
        self.flush()?;
        debug!(
            rows = self.rows,
            certs_written = summary.certs_written,
            "report closed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dircert_core::ExpiryStatus;

    fn record(entry: &str, status: ExpiryStatus, days: i64) -> ReportRecord {
        ReportRecord {
            entry_dn: entry.into(),
            certificate_dn: format!("CN={entry}, O=Acme"),
            serial_number: "0A1B".into(),
            expiry_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            expiry_status: status,
            days_to_expiry: days,
        }
    }

    #[test]
    fn writes_header_then_rows() {
        let mut sink = CsvReportSink::from_writer(Vec::new());
        sink.begin().unwrap();
        sink.write_record(&record("alice", ExpiryStatus::Expiring, 90))
            .unwrap();
        sink.write_record(&record("bob", ExpiryStatus::Expired, -3))
            .unwrap();
        sink.finish(&AuditSummary::default()).unwrap();
        assert_eq!(sink.rows(), 2);

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "EntryDn,CertificateDn,SerialNumber,ExpiryDate,ExpiryStatus,Days"
        );
        assert_eq!(lines[1], "alice,\"CN=alice, O=Acme\",0A1B,2024-04-01,EXPIRING,90");
        assert_eq!(lines[2], "bob,\"CN=bob, O=Acme\",0A1B,2024-04-01,EXPIRED,-3");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn header_is_written_once_even_without_rows() {
        let mut sink = CsvReportSink::from_writer(Vec::new());
        sink.begin().unwrap();
        sink.begin().unwrap();
        sink.finish(&AuditSummary::default()).unwrap();

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "EntryDn,CertificateDn,SerialNumber,ExpiryDate,ExpiryStatus,Days\n"
        );
    }

    #[test]
    fn rows_before_begin_are_rejected() {
        let mut sink = CsvReportSink::from_writer(Vec::new());
        let err = sink
            .write_record(&record("alice", ExpiryStatus::Ok, 400))
            .unwrap_err();
        assert!(matches!(err, ReportError::NotStarted));
    }

    #[test]
    fn file_report_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_REPORT_FILENAME);
        std::fs::write(&path, "stale report from last week\n").unwrap();

        let mut sink = CsvReportSink::create(&path).unwrap();
        assert_eq!(sink.path(), Some(path.as_path()));
        sink.begin().unwrap();
        sink.write_record(&record("carol", ExpiryStatus::Ok, 365))
            .unwrap();
        sink.finish(&AuditSummary::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.starts_with("EntryDn,"));
        assert!(text.contains("carol"));
    }

    #[test]
    fn unwritable_location_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CsvReportSink::create(dir.path().join("missing").join("report.csv"));
        assert!(matches!(result, Err(ReportError::Io { .. })));
    }
}
