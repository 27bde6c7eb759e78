// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ca-enroll-client contributors

//! Bearer token acquisition.
//!
//! The enrollment transport only needs an opaque bearer token; where it comes
//! from is a collaborator concern. This module ships two sources: a minimal
//! OAuth2 client-credential flow and a static token (argument or environment),
//! which stands in for ambient platform credentials.

use serde::Deserialize;
use url::Url;

use crate::error::{EnrollError, Result};

/// Default token authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Environment variable consulted by [`StaticToken::from_env`].
pub const TOKEN_ENV_VAR: &str = "ENROLL_BEARER_TOKEN";

/// An opaque OAuth2 bearer token.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log token material.
        write!(f, "BearerToken(<redacted>)")
    }
}

/// A supplier of bearer tokens scoped to an API audience.
#[allow(async_fn_in_trait)]
pub trait TokenSource {
    /// Acquire a token for the given API scope.
    async fn bearer_token(&self, scope: &str) -> Result<BearerToken>;
}

/// OAuth2 client-credential flow against a tenant token endpoint.
///
/// Posts `grant_type=client_credentials` to
/// `{authority}/{tenant_id}/oauth2/v2.0/token` with the scope widened to
/// `{scope}/.default`.
#[derive(Debug, Clone)]
pub struct ClientSecretFlow {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority: Url,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ClientSecretFlow {
    /// Create a flow against the default authority.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Self::with_authority(tenant_id, client_id, client_secret, DEFAULT_AUTHORITY)
    }

    /// Create a flow against a custom authority base URL.
    pub fn with_authority(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        authority: &str,
    ) -> Result<Self> {
        Ok(Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authority: Url::parse(authority)?,
        })
    }

    fn token_url(&self) -> Result<Url> {
        let mut url = self.authority.clone();
        url.set_path(&format!("/{}/oauth2/v2.0/token", self.tenant_id));
        Ok(url)
    }
}

impl TokenSource for ClientSecretFlow {
    async fn bearer_token(&self, scope: &str) -> Result<BearerToken> {
        let url = self.token_url()?;
        tracing::debug!("POST {}", url);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", &format!("{}/.default", scope)),
        ];

        let response = reqwest::Client::new().post(url).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrollError::token(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| EnrollError::token(format!("invalid token response: {}", e)))?;

        Ok(BearerToken::new(token.access_token))
    }
}

/// A pre-acquired token, e.g. from the environment.
#[derive(Debug, Clone)]
pub struct StaticToken(BearerToken);

impl StaticToken {
    /// Wrap an existing token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(BearerToken::new(token))
    }

    /// Read the token from `ENROLL_BEARER_TOKEN`.
    pub fn from_env() -> Result<Self> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.is_empty() => Ok(Self::new(token)),
            _ => Err(EnrollError::config(format!(
                "No credentials given and {} is not set",
                TOKEN_ENV_VAR
            ))),
        }
    }
}

impl TokenSource for StaticToken {
    async fn bearer_token(&self, _scope: &str) -> Result<BearerToken> {
        Ok(self.0.clone())
    }
}
