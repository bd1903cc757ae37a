//! Decoded certificate information.

use chrono::{DateTime, Utc};

/// A certificate decoded from exactly one directory value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Subject distinguished name (RFC 4514 style)
    pub subject: String,
    /// Serial number (uppercase hex, no separators)
    pub serial_number: String,
    /// Not valid after
    pub not_after: DateTime<Utc>,
    /// The DER encoding the certificate was decoded from
    pub raw: Vec<u8>,
}

impl Certificate {
    /// Check whether `not_after` is at or before the Unix epoch.
    ///
    /// Such a value cannot come from a real issuing CA.
    #[must_use]
    pub fn has_invalid_expiry(&self) -> bool {
        self.not_after <= DateTime::<Utc>::UNIX_EPOCH
    }
}
