//! Expiry classification.

use chrono::{DateTime, Utc};
use dircert_core::{Certificate, ExpiryStatus};
use serde::{Deserialize, Serialize};

/// Days before expiry at which a certificate counts as EXPIRING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarningPeriod(u32);

impl WarningPeriod {
    /// Default warning window
    pub const DEFAULT_DAYS: u32 = 90;

    /// Create a warning period of `days`
    #[must_use]
    pub const fn days(days: u32) -> Self {
        Self(days)
    }

    /// Length in days
    #[must_use]
    pub const fn as_days(self) -> u32 {
        self.0
    }
}

impl Default for WarningPeriod {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

/// Status and remaining days of one certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: ExpiryStatus,
    /// Whole days until `not_after`, truncated toward zero; negative once expired
    pub days_to_expiry: i64,
}

/// Classify `cert` against `now`.
///
/// EXPIRED when `not_after` is in the past, EXPIRING when at most
/// `warning` whole days remain, OK otherwise.
pub fn classify(cert: &Certificate, warning: WarningPeriod, now: DateTime<Utc>) -> Classification {
    let days_to_expiry = cert.not_after.signed_duration_since(now).num_days();

    let status = if cert.not_after < now {
        ExpiryStatus::Expired
    } else if days_to_expiry <= i64::from(warning.as_days()) {
        ExpiryStatus::Expiring
    } else {
        ExpiryStatus::Ok
    };

    Classification {
        status,
        days_to_expiry,
    }
}
