//! # dircert-audit
//!
//! Certificate expiry audit over directory entries.
//!
//! ## Data Flow
//!
//! ```text
//! EntrySource::search(root)          (per configured root, in order)
//!   -> DirectoryEntry                (one at a time, enumeration order)
//!   -> select_effective()            (decode each value, keep latest not_after)
//!   -> classify()                    (OK / EXPIRING / EXPIRED, whole days left)
//!   -> ReportSink::write_record()    (CSV row, flushed)
//!   -> AuditSummary                  (counters, handed to ReportSink::finish)
//! ```
//!
//! Unreachable roots and undecodable values are logged and recorded in the
//! [`AuditOutcome`](dircert_core::AuditOutcome); the pass always continues.

pub mod classifier;
pub mod decode;
pub mod engine;
pub mod report;
pub mod selector;

#[cfg(test)]
mod fixtures;

pub use classifier::{classify, Classification, WarningPeriod};
pub use decode::decode_certificate;
pub use engine::{AuditEngine, AuditSettings};
pub use report::{CsvReportSink, DEFAULT_REPORT_FILENAME};
pub use selector::{select_effective, DecodeFailure, EffectiveCertificate, Selection};
