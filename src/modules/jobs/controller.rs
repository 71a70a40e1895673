use anyhow::anyhow;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::Value;
use tracing::{instrument, warn};
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageParams};
use eadmin_models::common::ErrorResponse;
use eadmin_models::employment::{CreateJobDto, Job, JobApplication, JobsPage, UpdateJobDto};
use eadmin_models::users::StudentAvgGrade;

use super::service::{APPLY_FOR_SELF_ONLY, JobService, UniversityRelay};
use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::state::AppState;
use crate::validator::{ParsedPath, ValidatedJson};

fn university_relay<'a>(state: &'a AppState, auth_user: &'a AuthUser) -> UniversityRelay<'a> {
    UniversityRelay {
        upstream: &state.upstream,
        university_url: &state.services.university_url,
        token: &auth_user.token,
    }
}

/// Post a job; the calling employee becomes its employer
#[utoipa::path(
    post,
    path = "/api/v1/employmentOffice/jobs",
    request_body = CreateJobDto,
    responses(
        (status = 201, description = "Job created", body = Job),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Employees only", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_job(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateJobDto>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    check_role(&auth_user, Role::Employee)?;
    let job = JobService::create_job(&state.db, auth_user.email(), dto).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/jobs",
    params(PageParams),
    responses(
        (status = 200, description = "Page of jobs", body = JobsPage)
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_jobs(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<JobsPage>, AppError> {
    let page = JobService::get_jobs(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job found", body = Job),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = JobService::get_job(&state.db, id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    put,
    path = "/api/v1/employmentOffice/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobDto,
    responses(
        (status = 200, description = "Job updated", body = Job),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 403, description = "Employees only", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_job(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateJobDto>,
) -> Result<Json<Job>, AppError> {
    check_role(&auth_user, Role::Employee)?;
    let job = JobService::update_job(&state.db, id, dto).await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employmentOffice/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 403, description = "Employees only", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse)
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, Role::Employee)?;
    JobService::delete_job(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a candidate for a job
///
/// Jobs requiring a faculty degree are checked against the university.
#[utoipa::path(
    post,
    path = "/api/v1/employmentOffice/jobs/{id}/{email}/apply",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("email" = String, Path, description = "Candidate email")
    ),
    responses(
        (status = 201, description = "Application created", body = JobApplication),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 403, description = "Candidates only, applying as themselves, or graduation required", body = ErrorResponse),
        (status = 404, description = "Job or candidate not found", body = ErrorResponse),
        (status = 409, description = "Already applied", body = ErrorResponse),
        (status = 503, description = "University unavailable", body = ErrorResponse)
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn apply_for_job(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath((id, email)): ParsedPath<(Uuid, String)>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    check_role(&auth_user, Role::Candidate)?;
    if !email.trim().eq_ignore_ascii_case(auth_user.email()) {
        warn!(
            path_email = %email,
            token_email = %auth_user.email(),
            "candidate tried to apply on behalf of another account"
        );
        return Err(AppError::forbidden(anyhow!(APPLY_FOR_SELF_ONLY)));
    }
    let application =
        JobService::apply_for_job(&state.db, university_relay(&state, &auth_user), id, &email)
            .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// The job's applicants with their average grades, best first
#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/jobs/{id}/candidates",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Applicants with average grades", body = [StudentAvgGrade]),
        (status = 403, description = "Employees only", body = ErrorResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 503, description = "University unavailable", body = ErrorResponse)
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_job_candidates(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    check_role(&auth_user, Role::Employee)?;
    let body =
        JobService::get_job_candidates(&state.db, university_relay(&state, &auth_user), id)
            .await?;
    Ok(Json(body))
}
