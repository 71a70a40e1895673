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
    Course, CourseRegistration, CourseRegistrationsPage, CoursesPage, CreateCourseDto,
    UpdateCourseDto,
};

use super::service::CourseService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_role;
use crate::state::AppState;
use crate::validator::{ParsedPath, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/university/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 404, description = "Program not found", body = ErrorResponse),
        (status = 409, description = "Course code already exists", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    let course = CourseService::create_course(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/courses",
    params(PageParams),
    responses(
        (status = 200, description = "Page of courses", body = CoursesPage)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<CoursesPage>, AppError> {
    let page = CourseService::get_courses(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    Ok(Json(course))
}

#[utoipa::path(
    put,
    path = "/api/v1/university/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 404, description = "Course or program not found", body = ErrorResponse),
        (status = 409, description = "Course code already exists", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/v1/university/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 403, description = "Faculty admin only", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, Role::FacultyAdmin)?;
    CourseService::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Register the calling student for a course
#[utoipa::path(
    post,
    path = "/api/v1/university/courses/{id}/register",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 201, description = "Registered", body = CourseRegistration),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 403, description = "Students only", body = ErrorResponse),
        (status = 404, description = "Course or student not found", body = ErrorResponse),
        (status = 409, description = "Already registered", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn register_for_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<(StatusCode, Json<CourseRegistration>), AppError> {
    check_role(&auth_user, Role::Student)?;
    let registration =
        CourseService::register_for_course(&state.db, id, auth_user.email()).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

#[utoipa::path(
    get,
    path = "/api/v1/university/courses/my-registrations",
    params(PageParams),
    responses(
        (status = 200, description = "The caller's course registrations", body = CourseRegistrationsPage),
        (status = 403, description = "Students only", body = ErrorResponse)
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_registrations(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<CourseRegistrationsPage>, AppError> {
    check_role(&auth_user, Role::Student)?;
    let page = CourseService::get_my_registrations(&state.db, auth_user.email(), &params).await?;
    Ok(Json(page))
}
