// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ca-enroll-client contributors

//! HTTP/TLS client construction.

use std::time::Duration;

use crate::config::ClientIdentity;
use crate::error::{EnrollError, Result};

/// Build a reqwest client for a single enrollment invocation.
///
/// The client is created fresh per run and never pooled. When an identity is
/// given it is presented for TLS client authentication (the re-enrollment
/// case). TLS 1.2 is the floor.
pub fn build_http_client(
    identity: Option<&ClientIdentity>,
    timeout: Duration,
) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .use_rustls_tls()
        .min_tls_version(reqwest::tls::Version::TLS_1_2);

    if let Some(identity) = identity {
        let identity = reqwest::Identity::from_pem(identity.to_pem_bundle())
            .map_err(|e| EnrollError::tls(format!("Failed to create client identity: {}", e)))?;
        builder = builder.identity(identity);
    }

    builder
        .build()
        .map_err(|e| EnrollError::tls(format!("Failed to build HTTP client: {}", e)))
}
