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
use eadmin_models::employment::{HireResponse, Interview, InterviewsPage, ScheduleInterviewDto};

use super::service::InterviewService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::state::AppState;
use crate::validator::{ParsedPath, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/employmentOffice/interviews",
    request_body = ScheduleInterviewDto,
    responses(
        (status = 201, description = "Interview scheduled", body = Interview),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Candidates only", body = ErrorResponse),
        (status = 404, description = "Candidate or job application not found", body = ErrorResponse),
        (status = 409, description = "Interview already scheduled", body = ErrorResponse)
    ),
    tag = "Interviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn schedule_interview(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ScheduleInterviewDto>,
) -> Result<(StatusCode, Json<Interview>), AppError> {
    check_role(&auth_user, Role::Candidate)?;
    let interview = InterviewService::schedule_interview(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/interviews",
    params(PageParams),
    responses(
        (status = 200, description = "Page of interviews", body = InterviewsPage)
    ),
    tag = "Interviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_interviews(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<InterviewsPage>, AppError> {
    let page = InterviewService::get_interviews(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employmentOffice/interviews/{id}",
    params(("id" = Uuid, Path, description = "Interview ID")),
    responses(
        (status = 204, description = "Interview deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 403, description = "Employees only", body = ErrorResponse),
        (status = 404, description = "Interview not found", body = ErrorResponse)
    ),
    tag = "Interviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_interview(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, Role::Employee)?;
    InterviewService::delete_interview(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/v1/employmentOffice/interviews/{id}",
    params(("id" = Uuid, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Interview accepted", body = Interview),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 403, description = "Employees only", body = ErrorResponse),
        (status = 404, description = "Interview not found", body = ErrorResponse),
        (status = 409, description = "Interview already resolved", body = ErrorResponse)
    ),
    tag = "Interviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn accept_interview(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Interview>, AppError> {
    check_role(&auth_user, Role::Employee)?;
    let interview = InterviewService::accept_interview(&state.db, id).await?;
    Ok(Json(interview))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employmentOffice/interviews/{id}/reject",
    params(("id" = Uuid, Path, description = "Interview ID")),
    responses(
        (status = 204, description = "Candidate rejected and application withdrawn"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 403, description = "Employees only", body = ErrorResponse),
        (status = 404, description = "Interview not found", body = ErrorResponse),
        (status = 409, description = "Candidate already hired", body = ErrorResponse)
    ),
    tag = "Interviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn reject_interview(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, Role::Employee)?;
    InterviewService::reject_interview(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Hire a candidate for the job they were interviewed for
#[utoipa::path(
    patch,
    path = "/api/v1/employmentOffice/interviews/{id}/hire/{jobid}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID"),
        ("jobid" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Candidate hired", body = HireResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 403, description = "Employees only", body = ErrorResponse),
        (status = 404, description = "No open interview or candidate not found", body = ErrorResponse)
    ),
    tag = "Interviews",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn hire_candidate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath((candidate_id, job_id)): ParsedPath<(Uuid, Uuid)>,
) -> Result<Json<HireResponse>, AppError> {
    check_role(&auth_user, Role::Employee)?;
    let response = InterviewService::hire_candidate(&state.db, candidate_id, job_id).await?;
    Ok(Json(response))
}
