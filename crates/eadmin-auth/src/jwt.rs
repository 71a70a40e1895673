//! HS256 token issuing and verification.
//!
//! Tokens embed the holder's display name, email and role and expire a
//! fixed time after issuance (`JwtConfig::token_ttl`, 24 hours by default).
//! Verification is a pure function of the token bytes and the shared secret.

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use eadmin_config::JwtConfig;
use eadmin_core::AppError;

use crate::claims::TokenClaims;
use crate::roles::Role;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed structure or elapsed expiry.
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Issues a signed token for an identity.
///
/// # Errors
///
/// Fails only when the signing key cannot encode the claims.
pub fn issue_token(
    name: &str,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = now + jwt_config.token_ttl;

    let claims = TokenClaims {
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        iat: now as usize,
        exp: exp.max(0) as usize,
    };

    encode_claims(&claims, jwt_config)
}

/// Signs arbitrary claims with the shared secret.
pub fn encode_claims(claims: &TokenClaims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("failed to issue token: {}", e)))
}

/// Verifies a token's signature and expiry and returns its claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<TokenClaims, TokenError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            token_ttl: 86_400,
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let config = get_test_jwt_config();
        let token = issue_token("Ana Anić", "ana@uni.rs", Role::Student, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.name, "Ana Anić");
        assert_eq!(claims.email, "ana@uni.rs");
        assert_eq!(claims.role, "student");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = TokenClaims {
            name: String::new(),
            email: "old@uni.rs".to_string(),
            role: "professor".to_string(),
            iat: now - 90_000,
            exp: now - 3_600,
        };
        let token = encode_claims(&claims, &config).unwrap();

        assert!(matches!(
            verify_token(&token, &config),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let config = get_test_jwt_config();
        let token = issue_token("", "a@x.com", Role::Candidate, &config).unwrap();

        let other = JwtConfig {
            secret: "a-completely-different-secret-value".to_string(),
            token_ttl: 86_400,
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_garbage_is_invalid() {
        let config = get_test_jwt_config();
        assert!(verify_token("not.a.token", &config).is_err());
        assert!(verify_token("", &config).is_err());
    }
}
