use anyhow::{Context, anyhow};
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageMeta, PageParams, hash_password};
use eadmin_models::users::{
    Candidate, CreateEmployeeDto, Employee, EmployedResponse, EmployeesPage, UpdateEmployeeDto,
};

use crate::clients::{UNIVERSITY_SERVICE, UpstreamClient, endpoint};
use crate::utils::store::{count_role, normalize_email, write_error_with_reference};

pub const EMAIL_EXISTS: &str = "email already exists";

pub struct EmployeeService;

impl EmployeeService {
    #[instrument(skip(db, dto))]
    pub async fn create_employee(
        db: &PgPool,
        dto: CreateEmployeeDto,
    ) -> Result<Employee, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        sqlx::query_as::<_, Employee>(
            r#"INSERT INTO users (fullname, email, password, role, indexno, jobid)
               VALUES ($1, $2, $3, 'employee', $4, $5)
               RETURNING id, fullname, email, indexno, jobid"#,
        )
        .bind(dto.fullname.trim())
        .bind(normalize_email(&dto.email))
        .bind(&hashed_password)
        .bind(dto.indexno.as_deref().map(str::trim))
        .bind(dto.jobid)
        .fetch_one(db)
        .await
        .map_err(|e| {
            write_error_with_reference(
                e,
                EMAIL_EXISTS,
                "job not found",
                "Failed to create employee",
            )
        })
    }

    #[instrument(skip(db))]
    pub async fn get_employees(
        db: &PgPool,
        params: &PageParams,
    ) -> Result<EmployeesPage, AppError> {
        let total = count_role(db, Role::Employee).await?;

        let employees = sqlx::query_as::<_, Employee>(
            r#"SELECT id, fullname, email, indexno, jobid FROM users
               WHERE role = 'employee'
               ORDER BY fullname, id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch employees")
        .map_err(AppError::database)?;

        Ok(EmployeesPage {
            employees,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_employee(db: &PgPool, id: Uuid) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"SELECT id, fullname, email, indexno, jobid FROM users
               WHERE id = $1 AND role = 'employee'"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch employee")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("employee not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_employee_by_email(db: &PgPool, email: &str) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"SELECT id, fullname, email, indexno, jobid FROM users
               WHERE LOWER(email) = LOWER($1) AND role = 'employee'"#,
        )
        .bind(email.trim())
        .fetch_optional(db)
        .await
        .context("Failed to fetch employee by email")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("employee not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_employee(
        db: &PgPool,
        id: Uuid,
        dto: UpdateEmployeeDto,
    ) -> Result<Employee, AppError> {
        let existing = Self::get_employee(db, id).await?;

        let fullname = dto
            .fullname
            .map(|name| name.trim().to_string())
            .unwrap_or(existing.fullname);
        let email = dto
            .email
            .map(|email| normalize_email(&email))
            .unwrap_or(existing.email);
        let indexno = dto
            .indexno
            .map(|indexno| indexno.trim().to_string())
            .or(existing.indexno);
        let jobid = dto.jobid.or(existing.jobid);

        sqlx::query_as::<_, Employee>(
            r#"UPDATE users SET fullname = $1, email = $2, indexno = $3, jobid = $4
               WHERE id = $5 AND role = 'employee'
               RETURNING id, fullname, email, indexno, jobid"#,
        )
        .bind(&fullname)
        .bind(&email)
        .bind(&indexno)
        .bind(jobid)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            write_error_with_reference(
                e,
                EMAIL_EXISTS,
                "job not found",
                "Failed to update employee",
            )
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_employee(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'employee'")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete employee")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("employee not found")));
        }

        Ok(())
    }

    /// The employee behind `email` leaves their job and becomes a candidate.
    #[instrument(skip(db))]
    pub async fn quit_job(db: &PgPool, email: &str) -> Result<Candidate, AppError> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"UPDATE users SET role = 'candidate', jobid = NULL
               WHERE LOWER(email) = LOWER($1) AND role = 'employee'
               RETURNING id, fullname, email, indexno, jobid"#,
        )
        .bind(email.trim())
        .fetch_optional(db)
        .await
        .context("Failed to quit job")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("employee not found")))?;

        info!(user_id = %candidate.id, "employee quit their job");
        Ok(candidate)
    }

    #[instrument(skip(db))]
    pub async fn is_employed(db: &PgPool, indexno: &str) -> Result<EmployedResponse, AppError> {
        let indexno = indexno.trim().to_string();

        let employed = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE role = 'employee' AND indexno = $1)",
        )
        .bind(&indexno)
        .fetch_one(db)
        .await
        .context("Failed to check employment")
        .map_err(AppError::database)?;

        Ok(EmployedResponse { indexno, employed })
    }

    /// Relays the university's professor list unchanged.
    #[instrument(skip(upstream, token))]
    pub async fn get_university_professors(
        upstream: &UpstreamClient,
        university_url: &str,
        token: &str,
        params: &PageParams,
    ) -> Result<Value, AppError> {
        let url = endpoint(
            UNIVERSITY_SERVICE,
            university_url,
            &["api", "v1", "university", "professors"],
        )
        .map_err(AppError::upstream)?;

        let query = [
            ("page", params.page().to_string()),
            ("max", params.limit().to_string()),
        ];

        upstream
            .get_json_with_query(UNIVERSITY_SERVICE, url.as_str(), token, &query)
            .await
            .map_err(AppError::upstream)
    }
}
