// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ca-enroll-client contributors

//! Bundle assembly.
//!
//! Merges the issued certificate with the private key generated for the CSR
//! and serializes the pair as a password-protected PKCS#12 container. The
//! caller is responsible for writing the bytes; this module touches neither
//! network nor filesystem.

use der::Encode;
use p12_keystore::{Certificate as BundleCertificate, KeyStore, KeyStoreEntry, PrivateKeyChain};
use rcgen::KeyPair;

use crate::error::{EnrollError, Result};
use crate::types::IssuedCertificate;

/// Passphrase used when the caller does not supply one.
pub const DEFAULT_PASSPHRASE: &str = "password";

/// Alias of the key+certificate entry inside the container.
const ENTRY_ALIAS: &str = "enrolled-certificate";

/// Combine the issued certificate with its private key into a PKCS#12 bundle.
///
/// The certificate's SubjectPublicKeyInfo must byte-match the key pair's
/// public key; a CA that returns a certificate for a different key is a hard
/// [`EnrollError::KeyMismatch`], never silently accepted.
pub fn assemble(
    cert: &IssuedCertificate,
    key_pair: &KeyPair,
    passphrase: &str,
) -> Result<Vec<u8>> {
    let parsed = cert.to_certificate()?;

    let cert_spki = parsed
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(EnrollError::Der)?;
    if cert_spki != key_pair.public_key_der() {
        return Err(EnrollError::KeyMismatch);
    }

    let bundle_cert = BundleCertificate::from_der(cert.as_der())
        .map_err(|e| EnrollError::bundle(format!("Failed to load certificate: {}", e)))?;

    // The serial number serves as the localKeyId tying key and certificate
    // together inside the container.
    let local_key_id = parsed.tbs_certificate.serial_number.as_bytes().to_vec();

    let chain = PrivateKeyChain::new(key_pair.serialize_der(), local_key_id, vec![bundle_cert]);

    let mut store = KeyStore::new();
    store.add_entry(ENTRY_ALIAS, KeyStoreEntry::PrivateKeyChain(chain));

    store
        .writer(passphrase)
        .write()
        .map_err(|e| EnrollError::bundle(format!("Failed to serialize PKCS#12 bundle: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{CertificateParams, DnType, PKCS_ECDSA_P256_SHA256};

    fn issued_for(key_pair: &KeyPair, cn: &str) -> IssuedCertificate {
        let mut params = CertificateParams::default();
        params.distinguished_name.push(DnType::CommonName, cn);
        let cert = params.self_signed(key_pair).unwrap();
        IssuedCertificate::from_der(cert.der().to_vec())
    }

    #[test]
    fn test_assemble_and_reopen() {
        let key_pair = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
        let issued = issued_for(&key_pair, "Test");

        let bundle = assemble(&issued, &key_pair, "hunter2").expect("Failed to assemble bundle");

        let store = KeyStore::from_pkcs12(&bundle, "hunter2").expect("Bundle should reopen");
        let (_, chain) = store.private_key_chain().expect("Bundle should hold a key");

        assert_eq!(chain.key(), key_pair.serialize_der().as_slice());
        assert_eq!(chain.chain().len(), 1);
        assert_eq!(chain.chain()[0].as_der(), issued.as_der());
    }

    #[test]
    fn test_wrong_passphrase_fails_to_open() {
        let key_pair = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
        let issued = issued_for(&key_pair, "Test");

        let bundle = assemble(&issued, &key_pair, "correct").unwrap();
        assert!(KeyStore::from_pkcs12(&bundle, "wrong").is_err());
    }

    #[test]
    fn test_key_mismatch_is_rejected() {
        let enrollment_key = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
        let other_key = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
        let issued = issued_for(&other_key, "Test");

        let err = assemble(&issued, &enrollment_key, "pw").unwrap_err();
        assert!(matches!(err, EnrollError::KeyMismatch));
    }

    #[test]
    fn test_garbage_certificate_is_rejected() {
        let key_pair = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
        let issued = IssuedCertificate::from_der(vec![0xde, 0xad, 0xbe, 0xef]);

        let err = assemble(&issued, &key_pair, "pw").unwrap_err();
        assert!(matches!(err, EnrollError::CertificateParsing(_)));
    }
}
