//! Core types and traits for the directory certificate auditor.
//!
//! This crate provides the foundational pieces shared by the workspace:
//!
//! - **Types**: directory entries, decoded certificates, report rows and counters
//! - **Errors**: the run's error taxonomy, from per-blob decode failures up to
//!   run-fatal [`AuditError`]
//! - **Traits**: the [`EntrySource`], [`ReportSink`] and [`Notifier`] boundaries
//!
//! # Example
//!
//! ```rust,ignore
//! use dircert_core::{AuditSummary, ExpiryStatus};
//!
//! let mut summary = AuditSummary::default();
//! summary.record(ExpiryStatus::Expiring);
//! println!("{summary}");
//! ```

mod error;
mod source;
pub mod types;

pub use error::{AuditError, CertificateError, NotifyError, ReportError, Result, SourceError};
pub use source::{EntrySource, EntryStream, Notifier, ReportSink};
pub use types::*;
