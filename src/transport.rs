//! Enrollment transport.
//!
//! Resolves the endpoint for one of the three target shapes, performs exactly
//! one HTTP POST with the DER CSR, and hands the response body plus declared
//! content type to the envelope decoder. No retries, no persistent state
//! across calls.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use url::Url;

use crate::auth::BearerToken;
use crate::config::ClientIdentity;
use crate::decode;
use crate::error::{EnrollError, Result};
use crate::tls::build_http_client;
use crate::types::{content_types, endpoints, IssuedCertificate};

/// Default request deadline when the caller does not supply one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where and how a CSR is submitted.
#[derive(Debug, Clone)]
pub enum EnrollmentTarget {
    /// Direct CSR submission against `<base>/api/csr/`.
    CsrApi {
        /// CA base URL, e.g. `https://ca.example.com`.
        base_url: String,
    },

    /// EST simple enrollment against `<base>/.well-known/est/simpleenroll`.
    EstSimpleEnroll {
        /// CA base URL.
        base_url: String,
    },

    /// EST re-enrollment against `<base>/.well-known/est/simplereenroll`,
    /// authenticated with the existing client certificate over mutual TLS
    /// instead of a bearer token.
    EstSimpleReenroll {
        /// CA base URL.
        base_url: String,
        /// TLS client identity presented during the handshake.
        identity: ClientIdentity,
    },
}

impl EnrollmentTarget {
    /// Resolve the endpoint URL for this target.
    ///
    /// Endpoint paths are appended to the base URL, so a base carrying its
    /// own path segments (e.g. a per-tenant prefix) keeps them.
    pub fn endpoint_url(&self) -> Result<Url> {
        match self {
            Self::CsrApi { base_url } => Ok(Url::parse(&normalize_csr_api_url(base_url))?),
            Self::EstSimpleEnroll { base_url } => {
                Ok(Url::parse(&append_path(base_url, endpoints::EST_SIMPLE_ENROLL))?)
            }
            Self::EstSimpleReenroll { base_url, .. } => {
                Ok(Url::parse(&append_path(base_url, endpoints::EST_SIMPLE_REENROLL))?)
            }
        }
    }

    /// Whether this target authenticates with a bearer token.
    pub fn uses_bearer_token(&self) -> bool {
        !matches!(self, Self::EstSimpleReenroll { .. })
    }

    fn identity(&self) -> Option<&ClientIdentity> {
        match self {
            Self::EstSimpleReenroll { identity, .. } => Some(identity),
            _ => None,
        }
    }
}

/// Append an endpoint path to a base URL, tolerating a trailing slash.
fn append_path(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Canonicalize a CSR-API base URL to end in `/api/csr/`.
///
/// Idempotent: a base that already carries the suffix, with or without the
/// trailing slash, resolves to the same URL.
fn normalize_csr_api_url(base_url: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();
    if !url.ends_with(endpoints::CSR_API_SUFFIX) {
        url.push_str(endpoints::CSR_API_SUFFIX);
    }
    url.push('/');
    url
}

/// Transport for a single enrollment invocation.
///
/// Owns a freshly built HTTP client, identity-bound for re-enrollment
/// targets. Dropped together with the run; never reused.
#[derive(Debug)]
pub struct EnrollmentClient {
    target: EnrollmentTarget,
    http: reqwest::Client,
}

impl EnrollmentClient {
    /// Create a transport for the given target with an explicit deadline.
    pub fn new(target: EnrollmentTarget, timeout: Duration) -> Result<Self> {
        let http = build_http_client(target.identity(), timeout)?;
        Ok(Self { target, http })
    }

    /// The target this transport submits to.
    pub fn target(&self) -> &EnrollmentTarget {
        &self.target
    }

    /// Submit a DER-encoded CSR and return the issued leaf certificate.
    ///
    /// Bearer-mode targets require `token`; the re-enrollment target ignores
    /// it and authenticates through the TLS client certificate instead.
    pub async fn submit(
        &self,
        csr_der: &[u8],
        token: Option<&BearerToken>,
    ) -> Result<IssuedCertificate> {
        let url = self.target.endpoint_url()?;
        tracing::debug!("POST {}", url);

        let mut request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_types::PKCS10)
            .body(csr_der.to_vec());

        if self.target.uses_bearer_token() {
            let token = token.ok_or_else(|| {
                EnrollError::config("A bearer token is required for this enrollment target")
            })?;
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.as_str()));
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrollError::issuance_failed(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown"),
            ));
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.bytes().await?;
        let issued = decode::decode(&body, &media_type)?;

        tracing::info!("Certificate issued ({} bytes DER)", issued.as_der().len());
        Ok(issued)
    }
}
