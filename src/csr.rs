// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ca-enroll-client contributors

//! CSR (Certificate Signing Request) generation.
//!
//! Builds a PKCS#10 request over a freshly generated ECDSA P-256 key pair,
//! signed with SHA-256. The key pair lives only for the duration of the run
//! and is persisted solely inside the final bundle.

use const_oid::db::rfc5280::ID_KP_CLIENT_AUTH;
use const_oid::ObjectIdentifier;
use der::Encode;
use rcgen::{CertificateParams, CustomExtension, DnType, KeyPair, PKCS_ECDSA_P256_SHA256};
use x509_cert::ext::pkix::ExtendedKeyUsage;

use crate::error::{EnrollError, Result};

// id-ce-extKeyUsage
const EXT_KEY_USAGE_OID: &[u64] = &[2, 5, 29, 37];

/// Builder for the enrollment CSR.
///
/// # Example
///
/// ```no_run
/// use ca_enroll_client::csr::CsrBuilder;
///
/// let (csr_der, key_pair) = CsrBuilder::new()
///     .extended_key_usage_client_auth()
///     .build()
///     .expect("Failed to generate CSR");
/// ```
pub struct CsrBuilder {
    common_name: String,
    extended_key_usages: Vec<ObjectIdentifier>,
}

impl Default for CsrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrBuilder {
    /// Create a builder with the default subject `CN=Test` and no extended
    /// key usages.
    pub fn new() -> Self {
        Self {
            common_name: "Test".to_string(),
            extended_key_usages: Vec::new(),
        }
    }

    /// Set the Common Name (CN) for the subject.
    pub fn common_name(mut self, cn: impl Into<String>) -> Self {
        self.common_name = cn.into();
        self
    }

    /// Add an extended key usage OID.
    pub fn extended_key_usage(mut self, oid: ObjectIdentifier) -> Self {
        self.extended_key_usages.push(oid);
        self
    }

    /// Add TLS client authentication (1.3.6.1.5.5.7.3.2) extended key usage.
    pub fn extended_key_usage_client_auth(self) -> Self {
        self.extended_key_usage(ID_KP_CLIENT_AUTH)
    }

    /// Build the CSR with a new ECDSA P-256 key pair.
    ///
    /// When extended key usages were added, they are embedded as a critical
    /// X.509v3 extension before signing. Returns the DER-encoded CSR and the
    /// generated key pair; the request is immutable once built.
    pub fn build(self) -> Result<(Vec<u8>, KeyPair)> {
        let key_pair = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256)
            .map_err(|e| EnrollError::csr(format!("Failed to generate key pair: {}", e)))?;

        let mut params = CertificateParams::default();
        params
            .distinguished_name
            .push(DnType::CommonName, self.common_name);

        if !self.extended_key_usages.is_empty() {
            let content = ExtendedKeyUsage(self.extended_key_usages)
                .to_der()
                .map_err(|e| EnrollError::csr(format!("Failed to encode EKU set: {}", e)))?;

            let mut extension = CustomExtension::from_oid_content(EXT_KEY_USAGE_OID, content);
            extension.set_criticality(true);
            params.custom_extensions.push(extension);
        }

        let csr = params
            .serialize_request(&key_pair)
            .map_err(|e| EnrollError::csr(format!("Failed to serialize CSR: {}", e)))?;

        Ok((csr.der().to_vec(), key_pair))
    }
}
