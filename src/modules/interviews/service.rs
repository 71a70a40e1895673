//! Interview scheduling and resolution.
//!
//! An interview is open while `SCHEDULED` or `ACCEPTED`. At most one open
//! interview exists per job and candidate (`interviews_open_job_candidate_key`).
//! Resolving it either rejects the candidate, which also withdraws the job
//! application, or hires them, which turns the candidate into an employee of
//! the job.

use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageMeta, PageParams};
use eadmin_models::employment::{
    HireResponse, Interview, InterviewStatus, InterviewsPage, ScheduleInterviewDto,
};

use crate::metrics::track_hire;
use crate::utils::store::write_error;

pub const INTERVIEW_EXISTS: &str = "interview already scheduled";
pub const INTERVIEW_RESOLVED: &str = "interview is already resolved";

pub struct InterviewService;

impl InterviewService {
    #[instrument(skip(db, dto), fields(jobid = %dto.jobid, candidateid = %dto.candidateid))]
    pub async fn schedule_interview(
        db: &PgPool,
        dto: ScheduleInterviewDto,
    ) -> Result<Interview, AppError> {
        let candidate_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = $2)",
        )
        .bind(dto.candidateid)
        .bind(Role::Candidate.as_str())
        .fetch_one(db)
        .await
        .context("Failed to check candidate")
        .map_err(AppError::database)?;

        if !candidate_exists {
            return Err(AppError::not_found(anyhow!("candidate not found")));
        }

        let application_matches = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM job_applications
                   WHERE id = $1 AND jobid = $2 AND candidateid = $3
               )"#,
        )
        .bind(dto.jobapplicationid)
        .bind(dto.jobid)
        .bind(dto.candidateid)
        .fetch_one(db)
        .await
        .context("Failed to check job application")
        .map_err(AppError::database)?;

        if !application_matches {
            return Err(AppError::not_found(anyhow!("job application not found")));
        }

        let already_scheduled = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM interviews
                   WHERE jobapplicationid = $1
                      OR (jobid = $2 AND candidateid = $3 AND status IN ($4, $5))
               )"#,
        )
        .bind(dto.jobapplicationid)
        .bind(dto.jobid)
        .bind(dto.candidateid)
        .bind(InterviewStatus::Scheduled.as_str())
        .bind(InterviewStatus::Accepted.as_str())
        .fetch_one(db)
        .await
        .context("Failed to check existing interviews")
        .map_err(AppError::database)?;

        if already_scheduled {
            return Err(AppError::conflict(anyhow!(INTERVIEW_EXISTS)));
        }

        sqlx::query_as::<_, Interview>(
            r#"INSERT INTO interviews
                   (jobapplicationid, candidateid, jobid, datetime, type, location, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, jobapplicationid, candidateid, jobid, datetime, type, location, status"#,
        )
        .bind(dto.jobapplicationid)
        .bind(dto.candidateid)
        .bind(dto.jobid)
        .bind(dto.datetime)
        .bind(dto.interview_type.trim())
        .bind(dto.location.trim())
        .bind(InterviewStatus::Scheduled.as_str())
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, INTERVIEW_EXISTS, "Failed to schedule interview"))
    }

    #[instrument(skip(db))]
    pub async fn get_interviews(
        db: &PgPool,
        params: &PageParams,
    ) -> Result<InterviewsPage, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM interviews")
            .fetch_one(db)
            .await
            .context("Failed to count interviews")
            .map_err(AppError::database)?;

        let interviews = sqlx::query_as::<_, Interview>(
            r#"SELECT id, jobapplicationid, candidateid, jobid, datetime, type, location, status
               FROM interviews
               ORDER BY datetime, id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch interviews")
        .map_err(AppError::database)?;

        Ok(InterviewsPage {
            interviews,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_interview(db: &PgPool, id: Uuid) -> Result<Interview, AppError> {
        sqlx::query_as::<_, Interview>(
            r#"SELECT id, jobapplicationid, candidateid, jobid, datetime, type, location, status
               FROM interviews WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch interview")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("interview not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_interview(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM interviews WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete interview")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("interview not found")));
        }

        Ok(())
    }

    /// Marks an open interview as accepted. Accepting twice is a no-op.
    #[instrument(skip(db))]
    pub async fn accept_interview(db: &PgPool, id: Uuid) -> Result<Interview, AppError> {
        let accepted = sqlx::query_as::<_, Interview>(
            r#"UPDATE interviews SET status = $2
               WHERE id = $1 AND status IN ($3, $2)
               RETURNING id, jobapplicationid, candidateid, jobid, datetime, type, location, status"#,
        )
        .bind(id)
        .bind(InterviewStatus::Accepted.as_str())
        .bind(InterviewStatus::Scheduled.as_str())
        .fetch_optional(db)
        .await
        .context("Failed to accept interview")
        .map_err(AppError::database)?;

        match accepted {
            Some(interview) => Ok(interview),
            None => {
                // Either missing (404) or already resolved (409).
                Self::get_interview(db, id).await?;
                Err(AppError::conflict(anyhow!(INTERVIEW_RESOLVED)))
            }
        }
    }

    /// Rejects an open interview and withdraws the application it was scheduled on.
    #[instrument(skip(db))]
    pub async fn reject_interview(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let (application_id, status) = sqlx::query_as::<_, (Option<Uuid>, String)>(
            "SELECT jobapplicationid, status FROM interviews WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock interview")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("interview not found")))?;

        if status != InterviewStatus::Scheduled.as_str()
            && status != InterviewStatus::Accepted.as_str()
        {
            return Err(AppError::conflict(anyhow!(INTERVIEW_RESOLVED)));
        }

        sqlx::query("UPDATE interviews SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(InterviewStatus::Rejected.as_str())
            .execute(&mut *tx)
            .await
            .context("Failed to reject interview")
            .map_err(AppError::database)?;

        // Only the application this interview was scheduled on is withdrawn.
        if let Some(application_id) = application_id {
            sqlx::query("DELETE FROM job_applications WHERE id = $1")
                .bind(application_id)
                .execute(&mut *tx)
                .await
                .context("Failed to withdraw job application")
                .map_err(AppError::database)?;
        }

        tx.commit()
            .await
            .context("Failed to commit rejection")
            .map_err(AppError::database)?;

        Ok(())
    }

    /// Hires a candidate for a job they have an open interview for.
    ///
    /// The interview and the account change together or not at all.
    #[instrument(skip(db))]
    pub async fn hire_candidate(
        db: &PgPool,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<HireResponse, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let interview_id = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM interviews
               WHERE candidateid = $1 AND jobid = $2 AND status IN ($3, $4)
               FOR UPDATE"#,
        )
        .bind(candidate_id)
        .bind(job_id)
        .bind(InterviewStatus::Scheduled.as_str())
        .bind(InterviewStatus::Accepted.as_str())
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock interview")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow!("no open interview for this candidate and job"))
        })?;

        sqlx::query("UPDATE interviews SET status = $2 WHERE id = $1")
            .bind(interview_id)
            .bind(InterviewStatus::Hired.as_str())
            .execute(&mut *tx)
            .await
            .context("Failed to mark interview as hired")
            .map_err(AppError::database)?;

        let hired = sqlx::query(
            "UPDATE users SET role = $2, jobid = $3 WHERE id = $1 AND role = $4",
        )
        .bind(candidate_id)
        .bind(Role::Employee.as_str())
        .bind(job_id)
        .bind(Role::Candidate.as_str())
        .execute(&mut *tx)
        .await
        .context("Failed to hire candidate")
        .map_err(AppError::database)?;

        if hired.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("candidate not found")));
        }

        tx.commit()
            .await
            .context("Failed to commit hire")
            .map_err(AppError::database)?;

        track_hire();
        info!(%candidate_id, %job_id, "candidate hired");

        Ok(HireResponse {
            candidateid: candidate_id,
            jobid: job_id,
            role: Role::Employee.as_str().to_string(),
        })
    }
}
