use anyhow::anyhow;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use std::fmt;
use tracing::debug;

use eadmin_auth::Role;
use eadmin_core::AppError;

use crate::metrics::track_jwt_validation;
use crate::state::AppState;

pub const MISSING_TOKEN: &str = "missing bearer token";
pub const INVALID_TOKEN: &str = "invalid token";

/// The verified caller of a request.
///
/// The raw token is kept so that relays can forward it to sibling services.
#[derive(Clone)]
pub struct AuthUser {
    pub email: String,
    pub role: String,
    pub token: String,
}

// Handlers are instrumented with their arguments; keep the token out of spans.
impl fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthUser")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl AuthUser {
    /// The caller's role, or `None` when the token carries an unknown one.
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Extracts `<token>` from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized(anyhow!(MISSING_TOKEN)))?
            .to_string();

        let identity = state.verifier.verify(&token).await.map_err(|e| {
            debug!(error = %e, "token verification failed");
            track_jwt_validation(false);
            AppError::unauthorized(anyhow!(INVALID_TOKEN))
        })?;
        track_jwt_validation(true);

        Ok(AuthUser {
            email: identity.email,
            role: identity.role,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers_with("bearer abc")), Some("abc"));
    }

    #[test]
    fn test_malformed_headers_yield_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer")), None);
        assert_eq!(bearer_token(&headers_with("Bearer    ")), None);
        assert_eq!(bearer_token(&headers_with("abc.def")), None);
    }

    #[test]
    fn test_debug_hides_token() {
        let user = AuthUser {
            email: "x@y.z".to_string(),
            role: "student".to_string(),
            token: "secret.jwt.value".to_string(),
        };
        assert!(!format!("{:?}", user).contains("secret.jwt.value"));
    }

    #[test]
    fn test_unknown_role_is_none() {
        let user = AuthUser {
            email: "x@y.z".to_string(),
            role: "dean".to_string(),
            token: String::new(),
        };
        assert!(user.role().is_none());
    }
}
