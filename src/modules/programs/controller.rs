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
use eadmin_models::university::{CreateProgramDto, Program, ProgramsPage};

use super::service::ProgramService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::state::AppState;
use crate::validator::{ParsedPath, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/university/programs",
    request_body = CreateProgramDto,
    responses(
        (status = 201, description = "Program created", body = Program),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 409, description = "Program already exists", body = ErrorResponse)
    ),
    tag = "Programs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_program(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateProgramDto>,
) -> Result<(StatusCode, Json<Program>), AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    let program = ProgramService::create_program(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(program)))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/programs",
    params(PageParams),
    responses(
        (status = 200, description = "Page of programs", body = ProgramsPage)
    ),
    tag = "Programs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_programs(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<ProgramsPage>, AppError> {
    let page = ProgramService::get_programs(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/programs/{id}",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Program found", body = Program),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Program not found", body = ErrorResponse)
    ),
    tag = "Programs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_program(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Program>, AppError> {
    let program = ProgramService::get_program(&state.db, id).await?;
    Ok(Json(program))
}
