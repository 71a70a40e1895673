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
use eadmin_models::employment::JobApplicationsPage;

use super::service::JobApplicationService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_any_role;
use crate::state::AppState;
use crate::validator::ParsedPath;

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/jobapplications",
    params(PageParams),
    responses(
        (status = 200, description = "Page of job applications", body = JobApplicationsPage)
    ),
    tag = "Job Applications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_job_applications(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<JobApplicationsPage>, AppError> {
    let page = JobApplicationService::get_job_applications(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employmentOffice/jobapplications/{id}",
    params(("id" = Uuid, Path, description = "Job application ID")),
    responses(
        (status = 204, description = "Job application deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 404, description = "Job application not found", body = ErrorResponse)
    ),
    tag = "Job Applications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_job_application(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_any_role(&auth_user, &[Role::Employee, Role::Candidate, Role::SszAdmin])?;
    JobApplicationService::delete_job_application(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
