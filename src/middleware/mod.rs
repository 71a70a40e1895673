//! Request authentication and role checks.
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. The `AuthUser` extractor hands the token to the service's `TokenVerifier`
//! 3. Handlers call `check_role` / `check_any_role` before touching the store
//!
//! Any verifier failure, including an unreachable auth service, rejects the
//! request with 401.
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::check_role;
//! use eadmin_auth::Role;
//!
//! async fn enter_grade(auth_user: AuthUser) -> Result<impl IntoResponse, AppError> {
//!     check_role(&auth_user, Role::Professor)?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod role;
