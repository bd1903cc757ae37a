//! Self-signed certificates with chosen expiry dates, for tests.

use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair, SerialNumber};

/// Build a DER certificate for `CN=<cn>` expiring at midnight UTC on `(y, m, d)`.
///
/// `serial` must not start with a zero byte or have its top bit set.
pub fn cert_der(cn: &str, serial: &[u8], (year, month, day): (i32, u8, u8)) -> Vec<u8> {
    let key_pair = KeyPair::generate().expect("key generation");

    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, cn);
    params.distinguished_name = dn;
    params.serial_number = Some(SerialNumber::from_slice(serial));
    params.not_before = rcgen::date_time_ymd(1960, 1, 1);
    params.not_after = rcgen::date_time_ymd(year, month, day);

    params
        .self_signed(&key_pair)
        .expect("self-signed certificate")
        .der()
        .to_vec()
}

