// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ca-enroll-client contributors

//! Core enrollment types and protocol constants.

use der::Decode;
use x509_cert::Certificate;

use crate::error::{EnrollError, Result};

/// A certificate issued by the CA, held as DER bytes.
///
/// This is the output of the envelope decoder: for PKCS#7 responses it is the
/// single non-CA certificate re-encoded as DER, for `application/pkix-cert`
/// responses it is the response body unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCertificate {
    der: Vec<u8>,
}

impl IssuedCertificate {
    /// Wrap raw DER bytes.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self { der: der.into() }
    }

    /// The DER encoding of the certificate.
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// Consume and return the DER encoding.
    pub fn into_der(self) -> Vec<u8> {
        self.der
    }

    /// Parse into an X.509 certificate structure.
    pub fn to_certificate(&self) -> Result<Certificate> {
        Certificate::from_der(&self.der).map_err(|e| {
            EnrollError::certificate_parsing(format!("Failed to parse issued certificate: {}", e))
        })
    }
}

/// Content types used on the wire.
pub mod content_types {
    /// PKCS#10 CSR request body.
    pub const PKCS10: &str = "application/pkcs10";

    /// Raw DER certificate response.
    pub const PKIX_CERT: &str = "application/pkix-cert";

    /// PKCS#7/CMS response (degenerate SignedData envelope).
    pub const PKCS7_MIME: &str = "application/pkcs7-mime";
}

/// Endpoint path fragments.
pub mod endpoints {
    /// Suffix of the direct CSR submission API.
    pub const CSR_API_SUFFIX: &str = "/api/csr";

    /// EST simple enrollment path.
    pub const EST_SIMPLE_ENROLL: &str = "/.well-known/est/simpleenroll";

    /// EST simple re-enrollment path.
    pub const EST_SIMPLE_REENROLL: &str = "/.well-known/est/simplereenroll";
}
