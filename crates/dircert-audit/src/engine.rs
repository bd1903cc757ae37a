//! The audit pass.
//!
//! ```text
//! Init -> Enumerating(root) -> PerEntry { select -> classify -> emit }
//!      -> NextRoot -> ... -> Summarizing -> Done
//! ```
//!
//! Directory failures are scoped to the root that raised them and entry
//! problems to the entry; both are logged, recorded in the
//! [`AuditOutcome`], and the pass moves on. Only report sink failures abort.

use chrono::{DateTime, Utc};
use dircert_core::{
    AuditOutcome, DirectoryEntry, EntryIssue, EntrySource, IssueKind, ReportRecord, ReportSink,
    Result, RootFailure, SourceError,
};
use tracing::{debug, error, info, info_span};

use crate::classifier::{classify, WarningPeriod};
use crate::selector::{select_effective, Selection};

/// What to audit and how to classify it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSettings {
    /// Search base DNs, processed in order
    pub roots: Vec<String>,
    /// EXPIRING threshold
    pub warning_period: WarningPeriod,
}

impl AuditSettings {
    /// Settings for the given roots with the default warning period
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            warning_period: WarningPeriod::default(),
        }
    }

    /// Set the warning period
    #[must_use]
    pub const fn with_warning_period(mut self, warning_period: WarningPeriod) -> Self {
        self.warning_period = warning_period;
        self
    }
}

/// Runs one audit pass over every configured root.
#[derive(Debug, Clone)]
pub struct AuditEngine {
    settings: AuditSettings,
}

impl AuditEngine {
    /// Create an engine for `settings`
    #[must_use]
    pub const fn new(settings: AuditSettings) -> Self {
        Self { settings }
    }

    /// Audit against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Report`](dircert_core::AuditError::Report) when
    /// the sink fails. Rows written before the failure stay in the report.
    pub fn run<S, R>(&self, source: &mut S, sink: &mut R) -> Result<AuditOutcome>
    where
        S: EntrySource + ?Sized,
        R: ReportSink + ?Sized,
    {
        self.run_at(source, sink, Utc::now())
    }

    /// Audit with `now` fixed; two runs over the same data and the same
    /// `now` produce identical reports.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_at<S, R>(&self, source: &mut S, sink: &mut R, now: DateTime<Utc>) -> Result<AuditOutcome>
    where
        S: EntrySource + ?Sized,
        R: ReportSink + ?Sized,
    {
        let mut outcome = AuditOutcome::default();
        sink.begin()?;

        for root in &self.settings.roots {
            let _span = info_span!("root", root = %root).entered();
            self.audit_root(root, source, sink, now, &mut outcome)?;
        }

        sink.finish(&outcome.summary)?;
        info!(
            entries = outcome.entries_processed,
            certs_written = outcome.summary.certs_written,
            expired = outcome.summary.expired_count,
            expiring = outcome.summary.expiring_count,
            root_failures = outcome.root_failures.len(),
            "audit complete"
        );
        Ok(outcome)
    }

    fn audit_root<S, R>(
        &self,
        root: &str,
        source: &mut S,
        sink: &mut R,
        now: DateTime<Utc>,
        outcome: &mut AuditOutcome,
    ) -> Result<()>
    where
        S: EntrySource + ?Sized,
        R: ReportSink + ?Sized,
    {
        info!("enumerating search root");

        let entries = match source.search(root) {
            Ok(entries) => entries,
            Err(e) => {
                record_root_failure(outcome, root, 0, &e);
                return Ok(());
            }
        };

        let mut seen = 0u64;
        for entry in entries {
            match entry {
                Ok(entry) => {
                    seen += 1;
                    outcome.entries_processed += 1;
                    self.audit_entry(&entry, sink, now, outcome)?;
                }
                Err(e) => {
                    record_root_failure(outcome, root, seen, &e);
                    return Ok(());
                }
            }
        }

        debug!(entries = seen, "search root done");
        Ok(())
    }

    fn audit_entry<R>(
        &self,
        entry: &DirectoryEntry,
        sink: &mut R,
        now: DateTime<Utc>,
        outcome: &mut AuditOutcome,
    ) -> Result<()>
    where
        R: ReportSink + ?Sized,
    {
        let dn = &entry.distinguished_name;
        let selection = select_effective(&entry.certificate_blobs);

        for failure in selection.decode_failures() {
            error!(
                entry_dn = %dn,
                path = %entry.path,
                blob = failure.index,
                error = %failure.error,
                "certificate value did not decode"
            );
            outcome.entry_issues.push(EntryIssue {
                entry_dn: dn.clone(),
                kind: IssueKind::DecodeError {
                    blob: failure.index,
                    reason: failure.error.to_string(),
                },
            });
        }

        let effective = match selection {
            Selection::Effective(effective) => effective,
            Selection::NoCertificateAvailable { decode_failures } => {
                error!(
                    entry_dn = %dn,
                    values = entry.certificate_count(),
                    "no usable certificate on entry"
                );
                outcome.entry_issues.push(EntryIssue {
                    entry_dn: dn.clone(),
                    kind: IssueKind::NoCertificateAvailable {
                        decode_errors: decode_failures.len(),
                    },
                });
                return Ok(());
            }
        };

        if effective.has_invalid_expiry() {
            error!(
                entry_dn = %dn,
                not_after = %effective.certificate.not_after,
                "certificate expiry is at or before the Unix epoch"
            );
            outcome.entry_issues.push(EntryIssue {
                entry_dn: dn.clone(),
                kind: IssueKind::InvalidExpiry,
            });
        }

        let cert = &effective.certificate;
        let classification = classify(cert, self.settings.warning_period, now);
        let record = ReportRecord {
            entry_dn: dn.clone(),
            certificate_dn: cert.subject.clone(),
            serial_number: cert.serial_number.clone(),
            expiry_date: cert.not_after.date_naive(),
            expiry_status: classification.status,
            days_to_expiry: classification.days_to_expiry,
        };

        outcome.summary.record(record.expiry_status);
        sink.write_record(&record)?;
        debug!(
            entry_dn = %dn,
            status = %record.expiry_status,
            days = record.days_to_expiry,
            "record written"
        );
        Ok(())
    }
}

fn record_root_failure(outcome: &mut AuditOutcome, root: &str, seen: u64, e: &SourceError) {
    error!(
        root = %root,
        entries_before_failure = seen,
        error = %e,
        "search root failed, continuing with next root"
    );
    outcome.root_failures.push(RootFailure {
        root: root.to_string(),
        entries_before_failure: seen,
        error: e.to_string(),
    });
}
