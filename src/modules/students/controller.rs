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
    CreateStudentDto, EmailQuery, GraduationResponse, IndicesRequest, IndicesResponse, Student,
    StudentAvgGrade, StudentsPage, UpdateStudentDto,
};

use super::service::StudentService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::state::AppState;
use crate::validator::{JsonBody, ParsedPath, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/university/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 409, description = "Email or index number already exists", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// List students, each with the employment office's `employed` flag
#[utoipa::path(
    get,
    path = "/api/v1/university/students",
    params(PageParams),
    responses(
        (status = 200, description = "Page of students", body = StudentsPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 503, description = "Employment office unavailable", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<StudentsPage>, AppError> {
    let (students, meta) = StudentService::get_students(&state.db, &params).await?;
    let students = StudentService::with_employment(
        &state.upstream,
        &state.services.employment_url,
        &auth_user.token,
        state.services.employed_lookup_timeout,
        students,
    )
    .await?;

    Ok(Json(StudentsPage { students, meta }))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/students/by-email",
    params(EmailQuery),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student_by_email(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::get_student_by_email(&state.db, &query.email).await?;
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/v1/university/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Email or index number already exists", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/v1/university/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    StudentService::delete_student(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether the student with this index number has graduated
#[utoipa::path(
    get,
    path = "/api/v1/university/students/verify-graduation/{indexno}",
    params(("indexno" = String, Path, description = "Index number")),
    responses(
        (status = 200, description = "Graduation status", body = GraduationResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn verify_graduation(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(indexno): ParsedPath<String>,
) -> Result<Json<GraduationResponse>, AppError> {
    let response = StudentService::verify_graduation(&state.db, &indexno).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/students/get/indexno/all",
    responses(
        (status = 200, description = "All student index numbers", body = IndicesResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_all_indices(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<IndicesResponse>, AppError> {
    let response = StudentService::get_all_indices(&state.db).await?;
    Ok(Json(response))
}

/// Average grades of the students with the given index numbers
#[utoipa::path(
    post,
    path = "/api/v1/university/students/avg-grades",
    request_body = IndicesRequest,
    responses(
        (status = 200, description = "Students with their average grade", body = [StudentAvgGrade]),
        (status = 400, description = "No index numbers given", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, request))]
pub async fn get_avg_grades(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    JsonBody(request): JsonBody<IndicesRequest>,
) -> Result<Json<Vec<StudentAvgGrade>>, AppError> {
    let grades = StudentService::get_avg_grades(&state.db, request.indices).await?;
    Ok(Json(grades))
}
