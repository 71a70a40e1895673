use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageParams};
use eadmin_models::common::ErrorResponse;
use eadmin_models::users::{
    Candidate, CandidatesPage, CreateCandidateDto, EmailQuery, IndicesResponse,
    UpdateCandidateDto,
};

use super::service::CandidateService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{check_any_role, check_role};
use crate::state::AppState;
use crate::validator::{ParsedPath, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/employmentOffice/candidates",
    request_body = CreateCandidateDto,
    responses(
        (status = 201, description = "Candidate created", body = Candidate),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Employment office admin only", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "Candidates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_candidate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCandidateDto>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    check_role(&auth_user, Role::SszAdmin)?;
    let candidate = CandidateService::create_candidate(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/candidates",
    params(PageParams),
    responses(
        (status = 200, description = "Page of candidates", body = CandidatesPage)
    ),
    tag = "Candidates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_candidates(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<CandidatesPage>, AppError> {
    let page = CandidateService::get_candidates(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/candidates/by-email",
    params(EmailQuery),
    responses(
        (status = 200, description = "Candidate found", body = Candidate),
        (status = 404, description = "Candidate not found", body = ErrorResponse)
    ),
    tag = "Candidates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_candidate_by_email(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = CandidateService::get_candidate_by_email(&state.db, &query.email).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/candidates/{id}",
    params(("id" = Uuid, Path, description = "Candidate ID")),
    responses(
        (status = 200, description = "Candidate found", body = Candidate),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Candidate not found", body = ErrorResponse)
    ),
    tag = "Candidates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_candidate(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = CandidateService::get_candidate(&state.db, id).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    put,
    path = "/api/v1/employmentOffice/candidates/{id}",
    params(("id" = Uuid, Path, description = "Candidate ID")),
    request_body = UpdateCandidateDto,
    responses(
        (status = 200, description = "Candidate updated", body = Candidate),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 403, description = "Candidates and employment office admins only", body = ErrorResponse),
        (status = 404, description = "Candidate not found", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "Candidates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_candidate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCandidateDto>,
) -> Result<Json<Candidate>, AppError> {
    check_any_role(&auth_user, &[Role::Candidate, Role::SszAdmin])?;
    let candidate = CandidateService::update_candidate(&state.db, id, dto).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employmentOffice/candidates/{id}",
    params(("id" = Uuid, Path, description = "Candidate ID")),
    responses(
        (status = 204, description = "Candidate deleted"),
        (status = 403, description = "Employment office admin only", body = ErrorResponse),
        (status = 404, description = "Candidate not found", body = ErrorResponse)
    ),
    tag = "Candidates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_candidate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, Role::SszAdmin)?;
    CandidateService::delete_candidate(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The university's student index numbers, relayed unchanged
#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/candidates/get/indexno/all",
    responses(
        (status = 200, description = "All student index numbers", body = IndicesResponse),
        (status = 503, description = "University unavailable", body = ErrorResponse)
    ),
    tag = "Candidates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_university_indices(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let body = CandidateService::get_university_indices(
        &state.upstream,
        &state.services.university_url,
        &auth_user.token,
    )
    .await?;
    Ok(Json(body))
}
