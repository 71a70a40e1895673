//! Token verification seam used by request authentication.
//!
//! Downstream services never trust a token on their own: every protected
//! request is checked by a [`TokenVerifier`]. In production this is
//! [`HttpTokenVerifier`], a synchronous call to the auth service's verify
//! endpoint with a short fixed timeout. Every failure mode (timeout, refused
//! connection, non-200 answer, undecodable body, `ok: false`) is an error,
//! and callers must treat any error as unauthenticated.
//!
//! Caching or circuit breaking can be layered on by wrapping a verifier in
//! another implementation of the trait.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use eadmin_config::JwtConfig;

use crate::jwt::verify_token;

/// The identity a verified token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("auth service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("auth service rejected token with status {0}")]
    Rejected(StatusCode),
    #[error("auth service returned an undecodable body: {0}")]
    Malformed(#[source] reqwest::Error),
    #[error("auth service reported the token as not ok")]
    NotOk,
    #[error("invalid token")]
    InvalidToken,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}

/// Verifies tokens in-process with the shared secret.
///
/// Used by the auth service itself, which owns the secret.
#[derive(Clone, Debug)]
pub struct LocalTokenVerifier {
    jwt_config: JwtConfig,
}

impl LocalTokenVerifier {
    pub fn new(jwt_config: JwtConfig) -> Self {
        Self { jwt_config }
    }
}

#[async_trait]
impl TokenVerifier for LocalTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let claims =
            verify_token(token, &self.jwt_config).map_err(|_| VerifyError::InvalidToken)?;

        Ok(Identity {
            email: claims.email,
            role: claims.role,
        })
    }
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    email: String,
    #[serde(default)]
    role: String,
}

/// Verifies tokens by calling `GET {auth_url}/api/v1/auth/verify`.
#[derive(Clone, Debug)]
pub struct HttpTokenVerifier {
    client: Client,
    verify_url: String,
}

impl HttpTokenVerifier {
    /// Builds a verifier whose every call is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(auth_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            verify_url: format!("{}/api/v1/auth/verify", auth_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let response = self
            .client
            .get(&self.verify_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.verify_url, error = %e, "auth service unreachable");
                VerifyError::Unreachable(e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = %status.as_u16(), "auth service rejected token");
            return Err(VerifyError::Rejected(status));
        }

        let body: VerifyResponse = response.json().await.map_err(VerifyError::Malformed)?;
        if !body.ok {
            return Err(VerifyError::NotOk);
        }

        Ok(Identity {
            email: body.email,
            role: body.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::issue_token;
    use crate::roles::Role;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "verifier-test-secret-with-enough-length".to_string(),
            token_ttl: 3_600,
        }
    }

    #[tokio::test]
    async fn test_local_verifier_resolves_identity() {
        let token = issue_token("Pera", "pera@uni.rs", Role::Professor, &config()).unwrap();
        let identity = LocalTokenVerifier::new(config()).verify(&token).await.unwrap();

        assert_eq!(identity.email, "pera@uni.rs");
        assert_eq!(identity.role, "professor");
    }

    #[tokio::test]
    async fn test_local_verifier_rejects_garbage() {
        let result = LocalTokenVerifier::new(config()).verify("garbage").await;
        assert!(matches!(result, Err(VerifyError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_http_verifier_fails_closed_when_unreachable() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let verifier =
            HttpTokenVerifier::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = verifier.verify("any-token").await;

        assert!(matches!(result, Err(VerifyError::Unreachable(_))));
    }

    #[test]
    fn test_verify_url_is_normalized() {
        let verifier = HttpTokenVerifier::new("http://auth:8083/", Duration::from_secs(1)).unwrap();
        assert_eq!(verifier.verify_url, "http://auth:8083/api/v1/auth/verify");
    }
}
