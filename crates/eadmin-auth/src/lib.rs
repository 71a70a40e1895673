//! # eAdministration Auth
//!
//! Token issuing and verification shared by the auth service and the
//! downstream services.
//!
//! - [`claims`]: the signed token payload
//! - [`jwt`]: issue and verify HS256 tokens with the shared secret
//! - [`roles`]: the closed set of identity roles
//! - [`verifier`]: the [`TokenVerifier`] seam used by request authentication,
//!   with an in-process and a remote (HTTP) implementation
//!
//! Tokens are not revocable: a leaked token stays valid until it expires.
//!
//! # Example
//!
//! ```ignore
//! use eadmin_auth::{issue_token, verify_token, Role};
//! use eadmin_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = issue_token("Ana Anić", "ana@uni.rs", Role::Student, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, "student");
//! ```

pub mod claims;
pub mod jwt;
pub mod roles;
pub mod verifier;

pub use claims::TokenClaims;
pub use jwt::{TokenError, encode_claims, issue_token, verify_token};
pub use roles::Role;
pub use verifier::{HttpTokenVerifier, Identity, LocalTokenVerifier, TokenVerifier, VerifyError};
