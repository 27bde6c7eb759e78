//! Error types for the enrollment client.
//!
//! This module defines all error kinds that can occur during a single
//! enrollment run: configuration problems, transport failures, response
//! decoding errors, and bundle assembly errors.

use thiserror::Error;

/// Result type alias using [`EnrollError`].
pub type Result<T> = std::result::Result<T, EnrollError>;

/// Errors that can occur during certificate enrollment.
///
/// All variants are fatal for the current invocation; there is no retry
/// machinery. A failed run leaves no bundle on disk.
#[derive(Debug, Error)]
pub enum EnrollError {
    /// Invalid configuration: bad authentication method, missing required
    /// argument, or an unusable target description.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The CA rejected or failed the request at the HTTP layer.
    #[error("Could not issue certificate, HTTP status was {status} with reason {reason}")]
    IssuanceFailed {
        /// HTTP status code returned by the CA.
        status: u16,
        /// Reason phrase associated with the status.
        reason: String,
    },

    /// The CA returned a response format the decoder does not understand.
    #[error("Unsupported response media type: '{media_type}'")]
    UnsupportedMediaType {
        /// The offending Content-Type value.
        media_type: String,
    },

    /// A PKCS#7 envelope contained zero or more than one non-CA certificate,
    /// so the issued leaf cannot be selected unambiguously.
    #[error("Ambiguous leaf certificate: envelope contained {found} non-CA certificates")]
    AmbiguousLeafCertificate {
        /// Number of non-CA certificates found.
        found: usize,
    },

    /// Network or protocol failure reaching the endpoint.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS configuration error (client identity, trust setup).
    #[error("TLS error: {0}")]
    Tls(String),

    /// Failed to parse a CMS/PKCS#7 structure.
    #[error("CMS/PKCS#7 parsing error: {0}")]
    CmsParsing(String),

    /// Failed to parse or encode an X.509 certificate.
    #[error("Certificate parsing error: {0}")]
    CertificateParsing(String),

    /// Failed to generate a key pair or CSR.
    #[error("CSR error: {0}")]
    Csr(String),

    /// The issued certificate's public key does not match the generated key
    /// pair.
    #[error("Issued certificate public key does not match the generated key pair")]
    KeyMismatch,

    /// Failed to assemble or parse a PKCS#12 bundle.
    #[error("Bundle error: {0}")]
    Bundle(String),

    /// Bearer token acquisition failure.
    #[error("Token acquisition failed: {0}")]
    TokenAcquisition(String),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// DER encoding/decoding error.
    #[error("DER error: {0}")]
    Der(#[from] der::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EnrollError {
    /// Create a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an issuance failure with status code and reason phrase.
    pub fn issuance_failed(status: u16, reason: impl Into<String>) -> Self {
        Self::IssuanceFailed {
            status,
            reason: reason.into(),
        }
    }

    /// Create an unsupported media type error.
    pub fn unsupported_media_type(media_type: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            media_type: media_type.into(),
        }
    }

    /// Create an ambiguous leaf certificate error.
    pub fn ambiguous_leaf(found: usize) -> Self {
        Self::AmbiguousLeafCertificate { found }
    }

    /// Create a TLS error with the given message.
    pub fn tls(msg: impl Into<String>) -> Self {
        Self::Tls(msg.into())
    }

    /// Create a CMS parsing error with the given message.
    pub fn cms_parsing(msg: impl Into<String>) -> Self {
        Self::CmsParsing(msg.into())
    }

    /// Create a certificate parsing error with the given message.
    pub fn certificate_parsing(msg: impl Into<String>) -> Self {
        Self::CertificateParsing(msg.into())
    }

    /// Create a CSR error with the given message.
    pub fn csr(msg: impl Into<String>) -> Self {
        Self::Csr(msg.into())
    }

    /// Create a bundle error with the given message.
    pub fn bundle(msg: impl Into<String>) -> Self {
        Self::Bundle(msg.into())
    }

    /// Create a token acquisition error with the given message.
    pub fn token(msg: impl Into<String>) -> Self {
        Self::TokenAcquisition(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuance_failed_display() {
        let err = EnrollError::issuance_failed(503, "Service Unavailable");
        assert_eq!(
            err.to_string(),
            "Could not issue certificate, HTTP status was 503 with reason Service Unavailable"
        );
    }

    #[test]
    fn test_unsupported_media_type_display() {
        let err = EnrollError::unsupported_media_type("text/html");
        assert!(err.to_string().contains("text/html"));
    }

    #[test]
    fn test_ambiguous_leaf_display() {
        let err = EnrollError::ambiguous_leaf(2);
        assert!(err.to_string().contains("2 non-CA"));
    }
}
