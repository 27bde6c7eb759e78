// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ca-enroll-client contributors

//! # ca-enroll-client
//!
//! A certificate-enrollment client. One invocation generates a fresh ECDSA
//! P-256 key pair and PKCS#10 CSR, submits it to a certification authority
//! over one of three transports, decodes the response down to the issued
//! leaf certificate, and merges certificate and key into a password-protected
//! PKCS#12 bundle.
//!
//! ## Transports
//!
//! - **CSR API**: direct POST of the DER CSR to `<base>/api/csr/`
//! - **EST simpleenroll**: POST to `<base>/.well-known/est/simpleenroll`
//! - **EST simplereenroll**: POST to `<base>/.well-known/est/simplereenroll`,
//!   authenticated with the existing client certificate over mutual TLS
//!
//! Bearer-token targets attach `Authorization: Bearer <token>`; the
//! re-enrollment target presents a TLS client certificate instead and sends
//! no token.
//!
//! ## Response formats
//!
//! The CA may answer with the raw DER certificate (`application/pkix-cert`)
//! or a degenerate PKCS#7 SignedData envelope (`application/pkcs7-mime`),
//! optionally Base64-wrapped. Envelopes must contain exactly one non-CA
//! certificate; anything else is an error, never a guess.
//!
//! ## Example
//!
//! ```no_run
//! use ca_enroll_client::csr::CsrBuilder;
//! use ca_enroll_client::transport::DEFAULT_TIMEOUT;
//! use ca_enroll_client::{bundle, BearerToken, EnrollmentClient, EnrollmentTarget};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (csr_der, key_pair) = CsrBuilder::new()
//!     .extended_key_usage_client_auth()
//!     .build()?;
//!
//! let target = EnrollmentTarget::EstSimpleEnroll {
//!     base_url: "https://ca.example.com".to_string(),
//! };
//! let client = EnrollmentClient::new(target, DEFAULT_TIMEOUT)?;
//! let issued = client.submit(&csr_der, Some(&BearerToken::new("token"))).await?;
//!
//! let bundle = bundle::assemble(&issued, &key_pair, "password")?;
//! std::fs::write("my-certificate.pfx", bundle)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
pub mod bundle;
pub mod config;
pub mod csr;
pub mod decode;
pub mod error;
pub mod tls;
pub mod transport;
pub mod types;

pub use auth::{BearerToken, ClientSecretFlow, StaticToken, TokenSource};
pub use config::{AuthMethod, ClientIdentity};
pub use error::{EnrollError, Result};
pub use transport::{EnrollmentClient, EnrollmentTarget};
pub use types::IssuedCertificate;

// Re-export x509_cert::Certificate for convenience
pub use x509_cert::Certificate;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
