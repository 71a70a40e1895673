use anyhow::{Context, anyhow};
use sqlx::PgPool;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::instrument;
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageMeta, PageParams, hash_password};
use eadmin_models::users::{
    CreateStudentDto, EmployedResponse, GraduationResponse, IndicesResponse, Student,
    StudentAvgGrade, StudentListItem, StudentStatus, UpdateStudentDto,
};

use crate::clients::{EMPLOYMENT_SERVICE, UpstreamClient, endpoint};
use crate::utils::store::{count_role, normalize_email, write_error};

pub const STUDENT_EXISTS: &str = "email or index number already exists";
pub const INDICES_REQUIRED: &str = "indices are required";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto), fields(indexno = %dto.indexno))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let hashed_password = hash_password(&dto.password)?;
        let status = dto.status.unwrap_or(StudentStatus::Active);

        sqlx::query_as::<_, Student>(
            r#"INSERT INTO users (fullname, email, password, role, indexno, status)
               VALUES ($1, $2, $3, 'student', $4, $5)
               RETURNING id, fullname, email, indexno, ects, status"#,
        )
        .bind(dto.fullname.trim())
        .bind(normalize_email(&dto.email))
        .bind(&hashed_password)
        .bind(dto.indexno.trim())
        .bind(status.as_str())
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, STUDENT_EXISTS, "Failed to create student"))
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        params: &PageParams,
    ) -> Result<(Vec<Student>, PageMeta), AppError> {
        let total = count_role(db, Role::Student).await?;

        let students = sqlx::query_as::<_, Student>(
            r#"SELECT id, fullname, email, indexno, ects, status FROM users
               WHERE role = 'student'
               ORDER BY fullname, id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        Ok((students, PageMeta::new(params.page(), params.limit(), total)))
    }

    /// Asks the employment office, concurrently, whether each student is
    /// employed.
    ///
    /// Students without an index number are never looked up. One failed
    /// lookup fails the whole list.
    #[instrument(skip_all, fields(students = students.len()))]
    pub async fn with_employment(
        upstream: &UpstreamClient,
        employment_url: &str,
        token: &str,
        timeout: Duration,
        students: Vec<Student>,
    ) -> Result<Vec<StudentListItem>, AppError> {
        let mut lookups = JoinSet::new();

        for (position, student) in students.iter().enumerate() {
            let Some(indexno) = student.indexno.as_deref() else {
                continue;
            };
            let url = endpoint(
                EMPLOYMENT_SERVICE,
                employment_url,
                &["api", "v1", "employmentOffice", "employees", "employed", indexno],
            )
            .map_err(AppError::upstream)?;
            let upstream = upstream.clone();
            let token = token.to_string();

            lookups.spawn(async move {
                let result = upstream
                    .get_json_with_timeout::<EmployedResponse>(
                        EMPLOYMENT_SERVICE,
                        url.as_str(),
                        &token,
                        timeout,
                    )
                    .await;
                (position, result)
            });
        }

        let mut employed = vec![false; students.len()];
        while let Some(joined) = lookups.join_next().await {
            let (position, result) = joined
                .context("Employment lookup task failed")
                .map_err(AppError::internal)?;
            employed[position] = result.map_err(AppError::upstream)?.employed;
        }

        Ok(students
            .into_iter()
            .zip(employed)
            .map(|(student, employed)| StudentListItem { student, employed })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            r#"SELECT id, fullname, email, indexno, ects, status FROM users
               WHERE id = $1 AND role = 'student'"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("student not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_email(db: &PgPool, email: &str) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            r#"SELECT id, fullname, email, indexno, ects, status FROM users
               WHERE LOWER(email) = LOWER($1) AND role = 'student'"#,
        )
        .bind(email.trim())
        .fetch_optional(db)
        .await
        .context("Failed to fetch student by email")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(db, id).await?;

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
        let status = dto
            .status
            .map(|status| status.as_str().to_string())
            .or(existing.status);

        sqlx::query_as::<_, Student>(
            r#"UPDATE users SET fullname = $1, email = $2, indexno = $3, status = $4
               WHERE id = $5 AND role = 'student'
               RETURNING id, fullname, email, indexno, ects, status"#,
        )
        .bind(&fullname)
        .bind(&email)
        .bind(&indexno)
        .bind(&status)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, STUDENT_EXISTS, "Failed to update student"))
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'student'")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete student")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("student not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn verify_graduation(
        db: &PgPool,
        indexno: &str,
    ) -> Result<GraduationResponse, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"SELECT id, fullname, email, indexno, ects, status FROM users
               WHERE indexno = $1 AND role = 'student'"#,
        )
        .bind(indexno.trim())
        .fetch_optional(db)
        .await
        .context("Failed to fetch student by index number")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("student not found")))?;

        let status = student.status.as_deref() == Some(StudentStatus::Graduated.as_str());
        Ok(GraduationResponse { student, status })
    }

    #[instrument(skip(db))]
    pub async fn get_all_indices(db: &PgPool) -> Result<IndicesResponse, AppError> {
        let indices = sqlx::query_scalar::<_, String>(
            r#"SELECT indexno FROM users
               WHERE role = 'student' AND indexno IS NOT NULL
               ORDER BY indexno"#,
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch index numbers")
        .map_err(AppError::database)?;

        Ok(IndicesResponse { indices })
    }

    /// Students with the given index numbers, best average grade first.
    ///
    /// Students without any entered grade have a `null` average and come last.
    #[instrument(skip(db, indices), fields(indices = indices.len()))]
    pub async fn get_avg_grades(
        db: &PgPool,
        indices: Vec<String>,
    ) -> Result<Vec<StudentAvgGrade>, AppError> {
        let indices: Vec<String> = indices
            .iter()
            .map(|indexno| indexno.trim().to_string())
            .filter(|indexno| !indexno.is_empty())
            .collect();

        if indices.is_empty() {
            return Err(AppError::bad_request(anyhow!(INDICES_REQUIRED)));
        }

        sqlx::query_as::<_, StudentAvgGrade>(
            r#"SELECT u.id, u.fullname, u.email, u.indexno, u.ects, u.status,
                      AVG(er.grade)::FLOAT8 AS avggrade
               FROM users u
               LEFT JOIN exam_registrations er
                      ON er.studentid = u.id AND er.grade IS NOT NULL
               WHERE u.role = 'student' AND u.indexno = ANY($1)
               GROUP BY u.id
               ORDER BY avggrade DESC NULLS LAST, u.fullname"#,
        )
        .bind(&indices)
        .fetch_all(db)
        .await
        .context("Failed to compute average grades")
        .map_err(AppError::database)
    }
}
