use anyhow::{Context, anyhow};
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageMeta, PageParams};
use eadmin_models::employment::{CreateJobDto, Job, JobApplication, JobsPage, UpdateJobDto};
use eadmin_models::users::{GraduationCheck, IndicesRequest};

use crate::clients::{UNIVERSITY_SERVICE, UpstreamClient, endpoint};
use crate::metrics::track_job_application;
use crate::utils::store::{user_id_by_email, write_error};

pub const GRADUATION_REQUIRED: &str = "graduation is required for this job";
pub const APPLY_FOR_SELF_ONLY: &str = "candidates can only apply for themselves";
pub const ALREADY_APPLIED: &str = "already applied for this job";

/// Where a job application call reaches the university.
pub struct UniversityRelay<'a> {
    pub upstream: &'a UpstreamClient,
    pub university_url: &'a str,
    pub token: &'a str,
}

pub struct JobService;

impl JobService {
    /// Posts a job whose employer is the employee behind `email`.
    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create_job(db: &PgPool, email: &str, dto: CreateJobDto) -> Result<Job, AppError> {
        let employer_id = user_id_by_email(db, email, Role::Employee)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("employee not found")))?;

        sqlx::query_as::<_, Job>(
            r#"INSERT INTO jobs (employerid, title, description, location, requiredfaculty)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, employerid, title, description, location, requiredfaculty"#,
        )
        .bind(employer_id)
        .bind(dto.title.trim())
        .bind(dto.description.trim())
        .bind(dto.location.trim())
        .bind(dto.requiredfaculty)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, "job already exists", "Failed to create job"))
    }

    #[instrument(skip(db))]
    pub async fn get_jobs(db: &PgPool, params: &PageParams) -> Result<JobsPage, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(db)
            .await
            .context("Failed to count jobs")
            .map_err(AppError::database)?;

        let jobs = sqlx::query_as::<_, Job>(
            r#"SELECT id, employerid, title, description, location, requiredfaculty
               FROM jobs
               ORDER BY title, id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch jobs")
        .map_err(AppError::database)?;

        Ok(JobsPage {
            jobs,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_job(db: &PgPool, id: Uuid) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(
            r#"SELECT id, employerid, title, description, location, requiredfaculty
               FROM jobs WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch job")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("job not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_job(db: &PgPool, id: Uuid, dto: UpdateJobDto) -> Result<Job, AppError> {
        let existing = Self::get_job(db, id).await?;

        let title = dto
            .title
            .map(|title| title.trim().to_string())
            .unwrap_or(existing.title);
        let description = dto.description.unwrap_or(existing.description);
        let location = dto.location.unwrap_or(existing.location);
        let requiredfaculty = dto.requiredfaculty.unwrap_or(existing.requiredfaculty);

        sqlx::query_as::<_, Job>(
            r#"UPDATE jobs SET title = $1, description = $2, location = $3, requiredfaculty = $4
               WHERE id = $5
               RETURNING id, employerid, title, description, location, requiredfaculty"#,
        )
        .bind(&title)
        .bind(&description)
        .bind(&location)
        .bind(requiredfaculty)
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to update job")
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn delete_job(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete job")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("job not found")));
        }

        Ok(())
    }

    /// Applies the candidate behind `email` for a job.
    ///
    /// Jobs with `requiredfaculty` set ask the university whether the
    /// candidate's index number belongs to a graduated student. A university
    /// that cannot answer fails the application with 503.
    #[instrument(skip(db, university))]
    pub async fn apply_for_job(
        db: &PgPool,
        university: UniversityRelay<'_>,
        job_id: Uuid,
        email: &str,
    ) -> Result<JobApplication, AppError> {
        let job = Self::get_job(db, job_id).await?;

        let (candidate_id, indexno) = sqlx::query_as::<_, (Uuid, Option<String>)>(
            r#"SELECT id, indexno FROM users
               WHERE LOWER(email) = LOWER($1) AND role = 'candidate'"#,
        )
        .bind(email.trim())
        .fetch_optional(db)
        .await
        .context("Failed to fetch candidate")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("candidate not found")))?;

        if job.requiredfaculty {
            let Some(indexno) = indexno.filter(|indexno| !indexno.trim().is_empty()) else {
                debug!(%candidate_id, "candidate without index number applied for a faculty job");
                return Err(AppError::forbidden(anyhow!(GRADUATION_REQUIRED)));
            };

            let url = endpoint(
                UNIVERSITY_SERVICE,
                university.university_url,
                &["api", "v1", "university", "students", "verify-graduation", indexno.trim()],
            )
            .map_err(AppError::upstream)?;

            let check: GraduationCheck = university
                .upstream
                .get_json(UNIVERSITY_SERVICE, url.as_str(), university.token)
                .await
                .map_err(AppError::upstream)?;

            if !check.status {
                return Err(AppError::forbidden(anyhow!(GRADUATION_REQUIRED)));
            }
        }

        let already_applied = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM job_applications WHERE jobid = $1 AND candidateid = $2
               )"#,
        )
        .bind(job.id)
        .bind(candidate_id)
        .fetch_one(db)
        .await
        .context("Failed to check job application")
        .map_err(AppError::database)?;

        if already_applied {
            return Err(AppError::conflict(anyhow!(ALREADY_APPLIED)));
        }

        let application = sqlx::query_as::<_, JobApplication>(
            r#"INSERT INTO job_applications (jobid, candidateid)
               VALUES ($1, $2)
               RETURNING id, jobid, candidateid, createdat"#,
        )
        .bind(job.id)
        .bind(candidate_id)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, ALREADY_APPLIED, "Failed to apply for job"))?;

        track_job_application();
        Ok(application)
    }

    /// The job's applicants ranked by the university's average grades.
    ///
    /// Applicants without an index number are not ranked. No ranked
    /// applicants means an empty list without a remote call.
    #[instrument(skip(db, university))]
    pub async fn get_job_candidates(
        db: &PgPool,
        university: UniversityRelay<'_>,
        job_id: Uuid,
    ) -> Result<Value, AppError> {
        Self::get_job(db, job_id).await?;

        let indices = sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT u.indexno
               FROM job_applications ja
               JOIN users u ON u.id = ja.candidateid
               WHERE ja.jobid = $1 AND u.indexno IS NOT NULL
               ORDER BY u.indexno"#,
        )
        .bind(job_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch applicants' index numbers")
        .map_err(AppError::database)?;

        if indices.is_empty() {
            return Ok(Value::Array(Vec::new()));
        }

        let url = endpoint(
            UNIVERSITY_SERVICE,
            university.university_url,
            &["api", "v1", "university", "students", "avg-grades"],
        )
        .map_err(AppError::upstream)?;

        university
            .upstream
            .post_json(
                UNIVERSITY_SERVICE,
                url.as_str(),
                university.token,
                &IndicesRequest { indices },
            )
            .await
            .map_err(AppError::upstream)
    }
}
