use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// A single certificate blob could not be turned into a [`Certificate`](crate::Certificate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CertificateError {
    /// The bytes are not a DER-encoded X.509 certificate
    #[error("invalid DER certificate: {0}")]
    Der(String),

    /// The blob looked like PEM text but held no usable certificate
    #[error("invalid PEM certificate: {0}")]
    Pem(String),

    /// The attribute value was present but empty
    #[error("empty certificate value")]
    Empty,

    /// A validity timestamp cannot be represented as a UTC date
    #[error("certificate time out of range: {0}")]
    TimeOutOfRange(i64),
}

/// Errors raised while enumerating one search root.
///
/// These are always scoped to a single root; the engine records them and
/// moves on to the next configured root.
#[derive(Error, Debug)]
pub enum SourceError {
    /// TCP/TLS connection to the directory server failed
    #[error("cannot connect to directory server {server}: {reason}")]
    Connect {
        /// Server locator as configured
        server: String,
        /// Underlying failure
        reason: String,
    },

    /// The server rejected our bind
    #[error("bind to {server} as {identity} failed: {reason}")]
    Bind {
        /// Server locator as configured
        server: String,
        /// Bind DN, or `anonymous`
        identity: String,
        /// Underlying failure
        reason: String,
    },

    /// The search itself (or fetching a later page) failed
    #[error("search under '{root}' failed: {reason}")]
    Search {
        /// Search base DN
        root: String,
        /// Underlying failure
        reason: String,
    },
}

impl SourceError {
    /// Returns true if the failure happened before any entry could be read
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Bind { .. })
    }
}

/// Errors raised by a [`ReportSink`](crate::ReportSink).
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report file could not be created or written
    #[error("report I/O error on {path}: {source}")]
    Io {
        /// Report location
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The CSV writer failed
    #[error("CSV error: {0}")]
    Csv(String),

    /// Records were written before the sink was started
    #[error("report sink used before begin()")]
    NotStarted,
}

/// Errors raised by a [`Notifier`](crate::Notifier).
#[derive(Error, Debug)]
pub enum NotifyError {
    /// A sender or recipient address did not parse
    #[error("invalid mail address '{address}': {reason}")]
    Address {
        /// Offending address
        address: String,
        /// Parser message
        reason: String,
    },

    /// The message could not be assembled
    #[error("failed to build message: {0}")]
    Message(String),

    /// The transport refused or failed to send
    #[error("mail delivery failed: {0}")]
    Transport(String),
}

/// Run-fatal errors.
///
/// Anything that reaches this type aborts the audit; everything recoverable
/// is recorded in the [`AuditOutcome`](crate::AuditOutcome) instead.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The report could not be written
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// The final notification could not be delivered
    #[error("notification error: {0}")]
    Notify(#[from] NotifyError),

    /// The resolved settings are unusable
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_errors_are_distinguished_from_search_errors() {
        let connect = SourceError::Connect {
            server: "ldap.example.com".into(),
            reason: "refused".into(),
        };
        let search = SourceError::Search {
            root: "OU=People,DC=example,DC=com".into(),
            reason: "busy".into(),
        };

        assert!(connect.is_connectivity());
        assert!(!search.is_connectivity());
    }

    #[test]
    fn report_error_converts_into_audit_error() {
        let err: AuditError = ReportError::NotStarted.into();
        assert!(matches!(err, AuditError::Report(ReportError::NotStarted)));
        assert_eq!(err.to_string(), "report error: report sink used before begin()");
    }
}
