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
    Candidate, CreateEmployeeDto, EmailQuery, EmployedResponse, Employee, EmployeesPage,
    ProfessorsPage, UpdateEmployeeDto,
};

use super::service::EmployeeService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{check_any_role, check_role};
use crate::state::AppState;
use crate::validator::{ParsedPath, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/employmentOffice/employees",
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 403, description = "Employment office admin only", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_employee(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateEmployeeDto>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    check_role(&auth_user, Role::SszAdmin)?;
    let employee = EmployeeService::create_employee(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/employees",
    params(PageParams),
    responses(
        (status = 200, description = "Page of employees", body = EmployeesPage)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_employees(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<EmployeesPage>, AppError> {
    let page = EmployeeService::get_employees(&state.db, &params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/employees/by-email",
    params(EmailQuery),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_employee_by_email(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Employee>, AppError> {
    let employee = EmployeeService::get_employee_by_email(&state.db, &query.email).await?;
    Ok(Json(employee))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_employee(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<Json<Employee>, AppError> {
    let employee = EmployeeService::get_employee(&state.db, id).await?;
    Ok(Json(employee))
}

#[utoipa::path(
    put,
    path = "/api/v1/employmentOffice/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 403, description = "Employees and employment office admins only", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_employee(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateEmployeeDto>,
) -> Result<Json<Employee>, AppError> {
    check_any_role(&auth_user, &[Role::Employee, Role::SszAdmin])?;
    let employee = EmployeeService::update_employee(&state.db, id, dto).await?;
    Ok(Json(employee))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employmentOffice/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 403, description = "Employment office admin only", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ParsedPath(id): ParsedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    check_role(&auth_user, Role::SszAdmin)?;
    EmployeeService::delete_employee(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Quit the caller's job; the caller becomes a candidate again
#[utoipa::path(
    put,
    path = "/api/v1/employmentOffice/employees/quit/job",
    responses(
        (status = 200, description = "Job quit", body = Candidate),
        (status = 403, description = "Employees only", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn quit_job(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Candidate>, AppError> {
    check_role(&auth_user, Role::Employee)?;
    let candidate = EmployeeService::quit_job(&state.db, auth_user.email()).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/employees/employed/{indexno}",
    params(("indexno" = String, Path, description = "Index number")),
    responses(
        (status = 200, description = "Employment status", body = EmployedResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn is_employed(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ParsedPath(indexno): ParsedPath<String>,
) -> Result<Json<EmployedResponse>, AppError> {
    let response = EmployeeService::is_employed(&state.db, &indexno).await?;
    Ok(Json(response))
}

/// The university's professors, relayed unchanged
#[utoipa::path(
    get,
    path = "/api/v1/employmentOffice/employees/professors/all",
    params(PageParams),
    responses(
        (status = 200, description = "Page of professors", body = ProfessorsPage),
        (status = 503, description = "University unavailable", body = ErrorResponse)
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_university_professors(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, AppError> {
    let body = EmployeeService::get_university_professors(
        &state.upstream,
        &state.services.university_url,
        &auth_user.token,
        &params,
    )
    .await?;
    Ok(Json(body))
}
