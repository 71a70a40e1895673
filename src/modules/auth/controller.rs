use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::Query;
use tracing::instrument;

use eadmin_core::AppError;
use eadmin_models::auth::{
    AuthResponse, AuthorizeParams, AuthorizeResponse, LoginRequest, RegisterRequest,
    VerifyResponse,
};
use eadmin_models::common::ErrorResponse;

use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::JsonBody;

/// Register a new account and receive a token
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing fields, invalid JSON or invalid role", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, request))]
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = AuthService::register_user(&state.db, &state.jwt_config, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login and receive a token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing fields or invalid JSON", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, request))]
pub async fn login_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login_user(&state.db, &state.jwt_config, request).await?;
    Ok(Json(response))
}

/// Verify a bearer token
///
/// Called by the other services on every protected request.
#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn verify(auth_user: AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        ok: true,
        email: auth_user.email,
        role: auth_user.role,
    })
}

/// Verify a bearer token without a response body
#[utoipa::path(
    head,
    path = "/api/v1/auth/verify",
    responses(
        (status = 204, description = "Token is valid"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn verify_head(_auth_user: AuthUser) -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Check the caller's role against a set of roles
#[utoipa::path(
    get,
    path = "/api/v1/auth/authorize",
    params(AuthorizeParams),
    responses(
        (status = 200, description = "Role allowed", body = AuthorizeResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = AuthorizeResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn authorize(
    auth_user: AuthUser,
    Query(params): Query<AuthorizeParams>,
) -> (StatusCode, Json<AuthorizeResponse>) {
    let (status, body) = AuthService::authorize(&auth_user, &params);
    (status, Json(body))
}
