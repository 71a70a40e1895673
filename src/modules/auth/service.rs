//! Registration, login and authorization decisions.

use anyhow::{Context, anyhow};
use axum::http::StatusCode;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use eadmin_auth::{Role, issue_token};
use eadmin_config::JwtConfig;
use eadmin_core::{AppError, hash_password, verify_password};
use eadmin_db::is_unique_violation;
use eadmin_models::auth::{
    AuthResponse, AuthUserResponse, AuthorizeParams, AuthorizeResponse, Credentials, LoginRequest,
    RegisterRequest,
};

use crate::metrics::{
    track_authorization_check, track_jwt_issued, track_user_login_failure,
    track_user_login_success, track_user_registered,
};
use crate::middleware::auth::AuthUser;

pub const REGISTER_FIELDS_REQUIRED: &str = "fullName, email and password are required";
pub const LOGIN_FIELDS_REQUIRED: &str = "email and password are required";
pub const INVALID_CREDENTIALS: &str = "invalid email or password";
pub const EMAIL_EXISTS: &str = "email already exists";

pub struct AuthService;

impl AuthService {
    /// Resolves the requested role of a self-registration.
    ///
    /// An empty role means `candidate`. Administrative roles cannot be
    /// self-assigned.
    pub fn registration_role(raw: &str) -> Result<Role, AppError> {
        if raw.trim().is_empty() {
            return Ok(Role::Candidate);
        }

        let role: Role = raw
            .parse()
            .map_err(|_| AppError::bad_request(anyhow!("invalid role")))?;

        if role.is_admin() {
            return Err(AppError::bad_request(anyhow!("role cannot be self-assigned")));
        }

        Ok(role)
    }

    #[instrument(skip(db, jwt_config, request), fields(email = %request.email.trim()))]
    pub async fn register_user(
        db: &PgPool,
        jwt_config: &JwtConfig,
        request: RegisterRequest,
    ) -> Result<AuthResponse, AppError> {
        let full_name = request.full_name.trim();
        let email = request.email.trim().to_lowercase();
        let password = request.password.trim();

        if full_name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::bad_request(anyhow!(REGISTER_FIELDS_REQUIRED)));
        }

        let role = Self::registration_role(&request.role)?;
        let hashed_password = hash_password(password)?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO users (fullname, email, password, role)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(full_name)
        .bind(&email)
        .bind(&hashed_password)
        .bind(role.as_str())
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::conflict(anyhow!(EMAIL_EXISTS));
            }
            AppError::database(anyhow::Error::new(e).context("Failed to create user"))
        })?;

        let token = issue_token(full_name, &email, role, jwt_config)?;
        track_user_registered(role.as_str());
        track_jwt_issued();

        Ok(AuthResponse {
            token,
            user: AuthUserResponse {
                id,
                full_name: full_name.to_string(),
                email,
                role: role.to_string(),
            },
        })
    }

    #[instrument(skip(db, jwt_config, request), fields(email = %request.email.trim()))]
    pub async fn login_user(
        db: &PgPool,
        jwt_config: &JwtConfig,
        request: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let email = request.email.trim();
        let password = request.password.trim();

        if email.is_empty() || password.is_empty() {
            return Err(AppError::bad_request(anyhow!(LOGIN_FIELDS_REQUIRED)));
        }

        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, fullname, email, password, role FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(db)
        .await
        .context("Failed to load credentials")
        .map_err(AppError::database)?;

        let Some(credentials) = credentials else {
            track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized(anyhow!(INVALID_CREDENTIALS)));
        };

        if !verify_password(password, &credentials.password)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::unauthorized(anyhow!(INVALID_CREDENTIALS)));
        }

        let role: Role = credentials
            .role
            .parse()
            .map_err(|e| AppError::internal(anyhow!("stored role is invalid: {}", e)))?;

        let token = issue_token(&credentials.fullname, &credentials.email, role, jwt_config)?;
        track_user_login_success(role.as_str());
        track_jwt_issued();

        Ok(AuthResponse {
            token,
            user: AuthUserResponse {
                id: credentials.id,
                full_name: credentials.fullname,
                email: credentials.email,
                role: credentials.role,
            },
        })
    }

    /// Decides whether the caller's role is in the requested set.
    ///
    /// No requested role means any authenticated caller is allowed.
    pub fn authorize(
        auth_user: &AuthUser,
        params: &AuthorizeParams,
    ) -> (StatusCode, AuthorizeResponse) {
        let requested = params.requested_roles();
        let role = auth_user.role.to_ascii_lowercase();
        let allowed = requested.is_empty() || requested.contains(&role);
        track_authorization_check(allowed, &role);

        if allowed {
            (
                StatusCode::OK,
                AuthorizeResponse {
                    allowed: true,
                    email: Some(auth_user.email.clone()),
                    role,
                    reason: None,
                },
            )
        } else {
            (
                StatusCode::FORBIDDEN,
                AuthorizeResponse {
                    allowed: false,
                    email: None,
                    role,
                    reason: Some("insufficient role".to_string()),
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: &str) -> AuthUser {
        AuthUser {
            email: "a@x.com".to_string(),
            role: role.to_string(),
            token: String::new(),
        }
    }

    #[test]
    fn test_registration_role_defaults_to_candidate() {
        assert_eq!(AuthService::registration_role("").unwrap(), Role::Candidate);
        assert_eq!(AuthService::registration_role("  ").unwrap(), Role::Candidate);
    }

    #[test]
    fn test_registration_role_rejects_admins() {
        let err = AuthService::registration_role("sszadmin").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "role cannot be self-assigned");
    }

    #[test]
    fn test_registration_role_rejects_unknown() {
        let err = AuthService::registration_role("dean").unwrap_err();
        assert_eq!(err.message(), "invalid role");
    }

    #[test]
    fn test_authorize_without_roles_allows() {
        let (status, body) = AuthService::authorize(&caller("student"), &AuthorizeParams::default());
        assert_eq!(status, StatusCode::OK);
        assert!(body.allowed);
        assert_eq!(body.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_authorize_denies_outside_set() {
        let params = AuthorizeParams {
            role: vec!["professor".to_string()],
            any: Some("facultyadmin".to_string()),
        };
        let (status, body) = AuthService::authorize(&caller("student"), &params);
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(!body.allowed);
        assert_eq!(body.reason.as_deref(), Some("insufficient role"));
        assert_eq!(body.role, "student");
    }
}
