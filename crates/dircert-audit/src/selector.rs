//! Effective certificate selection.
//!
//! Directory entries frequently keep superseded certificates next to the
//! current one. The effective certificate is the one with the latest
//! `not_after`. When two certificates share the latest `not_after`, the one
//! that appears first on the entry wins; this tie-break is deterministic but
//! otherwise arbitrary.

use dircert_core::{Certificate, CertificateError};

use crate::decode::decode_certificate;

/// A value on an entry that did not decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    /// Position of the value on the entry
    pub index: usize,
    /// Why it failed
    pub error: CertificateError,
}

/// The certificate chosen to represent an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveCertificate {
    /// The chosen certificate
    pub certificate: Certificate,
    /// Position of the chosen value on the entry
    pub index: usize,
    /// Values that decoded successfully
    pub decoded: usize,
    /// Values that did not decode
    pub decode_failures: Vec<DecodeFailure>,
}

impl EffectiveCertificate {
    /// The chosen certificate expires at or before the Unix epoch.
    ///
    /// The record is still reported; callers log it as suspect data.
    #[must_use]
    pub fn has_invalid_expiry(&self) -> bool {
        self.certificate.has_invalid_expiry()
    }
}

/// Result of selecting among an entry's certificate values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// At least one value decoded
    Effective(EffectiveCertificate),
    /// Nothing usable on the entry
    NoCertificateAvailable {
        /// Every value that failed (empty if the entry had no values)
        decode_failures: Vec<DecodeFailure>,
    },
}

impl Selection {
    /// Decode failures recorded during selection
    #[must_use]
    pub fn decode_failures(&self) -> &[DecodeFailure] {
        match self {
            Self::Effective(effective) => &effective.decode_failures,
            Self::NoCertificateAvailable { decode_failures } => decode_failures,
        }
    }

    /// The chosen certificate, if any
    #[must_use]
    pub fn certificate(&self) -> Option<&Certificate> {
        match self {
            Self::Effective(effective) => Some(&effective.certificate),
            Self::NoCertificateAvailable { .. } => None,
        }
    }
}

/// Select the effective certificate among raw values.
///
/// Never fails: undecodable values are collected as [`DecodeFailure`]s and
/// the remaining values are still considered.
pub fn select_effective<B: AsRef<[u8]>>(blobs: &[B]) -> Selection {
    let mut chosen: Option<(usize, Certificate)> = None;
    let mut decoded = 0;
    let mut decode_failures = Vec::new();

    for (index, blob) in blobs.iter().enumerate() {
        match decode_certificate(blob.as_ref()) {
            Ok(cert) => {
                decoded += 1;
                let newer = chosen
                    .as_ref()
                    .map_or(true, |(_, current)| cert.not_after > current.not_after);
                if newer {
                    chosen = Some((index, cert));
                }
            }
            Err(error) => decode_failures.push(DecodeFailure { index, error }),
        }
    }

    match chosen {
        Some((index, certificate)) => Selection::Effective(EffectiveCertificate {
            certificate,
            index,
            decoded,
            decode_failures,
        }),
        None => Selection::NoCertificateAvailable { decode_failures },
    }
}
