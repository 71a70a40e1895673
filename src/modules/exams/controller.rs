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
use eadmin_models::university::{
    CreateExamDto, EnterGradeDto, Exam, ExamRegistration, ExamRegistrationsPage, ExamsPage,
    GradeResponse, UpdateExamDto,
};

use super::service::ExamService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::state::AppState;
use crate::validator::{JsonBody, ParsedPath, ValidatedJson};

/// Schedule an exam proctored by the calling professor
#[utoipa::path(
    post,
    path = "/api/v1/university/exams",
    request_body = CreateExamDto,
    responses(
        (status = 201, description = "Exam created", body = Exam),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Professors only", body = ErrorResponse),
        (status = 404, description = "Course or professor not found", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_exam(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> Result<(StatusCode, Json<Exam>), AppError> {
    check_role(&auth_user, Role::Professor)?;
    let exam = ExamService::create_exam(&state.db, auth_user.email(), dto).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/exams",
    params(PageParams),
    responses(
        (status = 200, description = "Page of exams", body = ExamsPage)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_exams(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<ExamsPage>, AppError> {
    let page = ExamService::get_exams(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/exams/{id}",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam found", body = Exam),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_exam(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Exam>, AppError> {
    let exam = ExamService::get_exam(&state.db, id).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    put,
    path = "/api/v1/university/exams/{id}",
    params(("id" = Uuid, Path, description = "Exam ID")),
    request_body = UpdateExamDto,
    responses(
        (status = 200, description = "Exam updated", body = Exam),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 403, description = "Professors only", body = ErrorResponse),
        (status = 404, description = "Exam or course not found", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_exam(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateExamDto>,
) -> Result<Json<Exam>, AppError> {
    check_role(&auth_user, Role::Professor)?;
    let exam = ExamService::update_exam(&state.db, id, dto).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    delete,
    path = "/api/v1/university/exams/{id}",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 204, description = "Exam deleted"),
        (status = 403, description = "Professors only", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_exam(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, Role::Professor)?;
    ExamService::delete_exam(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/university/exams/{id}/register",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 201, description = "Registered", body = ExamRegistration),
        (status = 400, description = "Invalid id or not registered for the course", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "Exam or student not found", body = ErrorResponse),
        (status = 409, description = "Already registered", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn register_for_exam(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<(StatusCode, Json<ExamRegistration>), AppError> {
    check_role(&auth_user, Role::Student)?;
    let registration = ExamService::register_for_exam(&state.db, id, auth_user.email()).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/exams/my-registrations",
    params(PageParams),
    responses(
        (status = 200, description = "The caller's exam registrations", body = ExamRegistrationsPage),
        (status = 403, description = "Students only", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_registrations(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<ExamRegistrationsPage>, AppError> {
    check_role(&auth_user, Role::Student)?;
    let page = ExamService::get_my_registrations(&state.db, auth_user.email(), &params).await?;
    Ok(Json(page))
}

/// Enter a student's grade for an exam
///
/// A grade can be entered once. Passing grades (6 and above) accrue the
/// course's ECTS and may graduate the student.
#[utoipa::path(
    put,
    path = "/api/v1/university/exams/{id}/grade",
    params(("id" = Uuid, Path, description = "Exam ID")),
    request_body = EnterGradeDto,
    responses(
        (status = 200, description = "Grade entered", body = GradeResponse),
        (status = 400, description = "Invalid id or grade", body = ErrorResponse),
        (status = 403, description = "Professors only", body = ErrorResponse),
        (status = 404, description = "Exam registration not found", body = ErrorResponse),
        (status = 409, description = "Grade already entered", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn enter_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
    JsonBody(dto): JsonBody<EnterGradeDto>,
) -> Result<Json<GradeResponse>, AppError> {
    check_role(&auth_user, Role::Professor)?;
    let response = ExamService::enter_grade(&state.db, id, dto).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/exams/{id}/examregistrations",
    params(("id" = Uuid, Path, description = "Exam ID"), PageParams),
    responses(
        (status = 200, description = "Registrations for the exam", body = ExamRegistrationsPage),
        (status = 403, description = "Professors only", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    tag = "Exams",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_exam_registrations(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<ExamRegistrationsPage>, AppError> {
    check_role(&auth_user, Role::Professor)?;
    let page = ExamService::get_exam_registrations(&state.db, id, &params).await?;
    Ok(Json(page))
}
