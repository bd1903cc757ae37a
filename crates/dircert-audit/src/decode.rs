//! X.509 decoding of raw directory values.

use chrono::{DateTime, TimeZone, Utc};
use dircert_core::{Certificate, CertificateError};

const PEM_MARKER: &[u8] = b"-----BEGIN ";

/// Decode one certificate value.
///
/// Directory servers hand out `userCertificate` as DER. A value that is PEM
/// text is accepted too; its first `CERTIFICATE` block is used.
pub fn decode_certificate(blob: &[u8]) -> Result<Certificate, CertificateError> {
    if blob.is_empty() {
        return Err(CertificateError::Empty);
    }

    if looks_like_pem(blob) {
        let block = pem::parse_many(blob)
            .map_err(|e| CertificateError::Pem(e.to_string()))?
            .into_iter()
            .find(|p| p.tag() == "CERTIFICATE")
            .ok_or_else(|| CertificateError::Pem("no CERTIFICATE block".to_string()))?;
        return parse_der(block.contents());
    }

    parse_der(blob)
}

fn looks_like_pem(blob: &[u8]) -> bool {
    let head = &blob[..blob.len().min(64)];
    head.windows(PEM_MARKER.len()).any(|w| w == PEM_MARKER)
}

fn parse_der(der: &[u8]) -> Result<Certificate, CertificateError> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| CertificateError::Der(e.to_string()))?;

    let not_after = asn1_to_utc(cert.validity().not_after)?;

    Ok(Certificate {
        subject: cert.subject().to_string(),
        serial_number: hex::encode_upper(cert.raw_serial()),
        not_after,
        raw: der.to_vec(),
    })
}

/// Convert an ASN.1 `GeneralizedTime` / `UTCTime` to `DateTime<Utc>`.
fn asn1_to_utc(t: x509_parser::time::ASN1Time) -> Result<DateTime<Utc>, CertificateError> {
    let epoch = t.timestamp();
    Utc.timestamp_opt(epoch, 0)
        .single()
        .ok_or(CertificateError::TimeOutOfRange(epoch))
}
