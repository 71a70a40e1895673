use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageParams};
use eadmin_models::common::ErrorResponse;
use eadmin_models::users::{
    CreateProfessorDto, EmailQuery, Professor, ProfessorsPage, UpdateProfessorDto,
};

use super::service::ProfessorService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::state::AppState;
use crate::validator::{ParsedPath, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/university/professors",
    request_body = CreateProfessorDto,
    responses(
        (status = 201, description = "Professor created", body = Professor),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "Professors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_professor(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateProfessorDto>,
) -> Result<(StatusCode, Json<Professor>), AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    let professor = ProfessorService::create_professor(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(professor)))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/professors",
    params(PageParams),
    responses(
        (status = 200, description = "Page of professors", body = ProfessorsPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Professors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_professors(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<ProfessorsPage>, AppError> {
    let page = ProfessorService::get_professors(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/professors/by-email",
    params(EmailQuery),
    responses(
        (status = 200, description = "Professor found", body = Professor),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Professor not found", body = ErrorResponse)
    ),
    tag = "Professors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_professor_by_email(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Professor>, AppError> {
    let professor = ProfessorService::get_professor_by_email(&state.db, &query.email).await?;
    Ok(Json(professor))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/professors/{id}",
    params(("id" = Uuid, Path, description = "Professor ID")),
    responses(
        (status = 200, description = "Professor found", body = Professor),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Professor not found", body = ErrorResponse)
    ),
    tag = "Professors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_professor(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Professor>, AppError> {
    let professor = ProfessorService::get_professor(&state.db, id).await?;
    Ok(Json(professor))
}

#[utoipa::path(
    put,
    path = "/api/v1/university/professors/{id}",
    params(("id" = Uuid, Path, description = "Professor ID")),
    request_body = UpdateProfessorDto,
    responses(
        (status = 200, description = "Professor updated", body = Professor),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 404, description = "Professor not found", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "Professors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_professor(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateProfessorDto>,
) -> Result<Json<Professor>, AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    let professor = ProfessorService::update_professor(&state.db, id, dto).await?;
    Ok(Json(professor))
}

#[utoipa::path(
    delete,
    path = "/api/v1/university/professors/{id}",
    params(("id" = Uuid, Path, description = "Professor ID")),
    responses(
        (status = 204, description = "Professor deleted"),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 404, description = "Professor not found", body = ErrorResponse),
        (status = 409, description = "Professor still proctors exams", body = ErrorResponse)
    ),
    tag = "Professors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_professor(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    ProfessorService::delete_professor(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
