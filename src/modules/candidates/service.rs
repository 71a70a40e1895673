use anyhow::{Context, anyhow};
use serde_json::Value;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageMeta, PageParams, hash_password};
use eadmin_models::users::{Candidate, CandidatesPage, CreateCandidateDto, UpdateCandidateDto};

use crate::clients::{UNIVERSITY_SERVICE, UpstreamClient, endpoint};
use crate::utils::store::{count_role, normalize_email, write_error};

pub const EMAIL_EXISTS: &str = "email already exists";

pub struct CandidateService;

impl CandidateService {
    #[instrument(skip(db, dto))]
    pub async fn create_candidate(
        db: &PgPool,
        dto: CreateCandidateDto,
    ) -> Result<Candidate, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        sqlx::query_as::<_, Candidate>(
            r#"INSERT INTO users (fullname, email, password, role, indexno)
               VALUES ($1, $2, $3, 'candidate', $4)
               RETURNING id, fullname, email, indexno, jobid"#,
        )
        .bind(dto.fullname.trim())
        .bind(normalize_email(&dto.email))
        .bind(&hashed_password)
        .bind(dto.indexno.as_deref().map(str::trim))
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, EMAIL_EXISTS, "Failed to create candidate"))
    }

    #[instrument(skip(db))]
    pub async fn get_candidates(
        db: &PgPool,
        params: &PageParams,
    ) -> Result<CandidatesPage, AppError> {
        let total = count_role(db, Role::Candidate).await?;

        let candidates = sqlx::query_as::<_, Candidate>(
            r#"SELECT id, fullname, email, indexno, jobid FROM users
               WHERE role = 'candidate'
               ORDER BY fullname, id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch candidates")
        .map_err(AppError::database)?;

        Ok(CandidatesPage {
            candidates,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_candidate(db: &PgPool, id: Uuid) -> Result<Candidate, AppError> {
        sqlx::query_as::<_, Candidate>(
            r#"SELECT id, fullname, email, indexno, jobid FROM users
               WHERE id = $1 AND role = 'candidate'"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch candidate")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("candidate not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_candidate_by_email(db: &PgPool, email: &str) -> Result<Candidate, AppError> {
        sqlx::query_as::<_, Candidate>(
            r#"SELECT id, fullname, email, indexno, jobid FROM users
               WHERE LOWER(email) = LOWER($1) AND role = 'candidate'"#,
        )
        .bind(email.trim())
        .fetch_optional(db)
        .await
        .context("Failed to fetch candidate by email")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("candidate not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_candidate(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCandidateDto,
    ) -> Result<Candidate, AppError> {
        let existing = Self::get_candidate(db, id).await?;

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

        sqlx::query_as::<_, Candidate>(
            r#"UPDATE users SET fullname = $1, email = $2, indexno = $3
               WHERE id = $4 AND role = 'candidate'
               RETURNING id, fullname, email, indexno, jobid"#,
        )
        .bind(&fullname)
        .bind(&email)
        .bind(&indexno)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, EMAIL_EXISTS, "Failed to update candidate"))
    }

    #[instrument(skip(db))]
    pub async fn delete_candidate(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'candidate'")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete candidate")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("candidate not found")));
        }

        Ok(())
    }

    /// Relays the university's list of student index numbers unchanged.
    #[instrument(skip(upstream, token))]
    pub async fn get_university_indices(
        upstream: &UpstreamClient,
        university_url: &str,
        token: &str,
    ) -> Result<Value, AppError> {
        let url = endpoint(
            UNIVERSITY_SERVICE,
            university_url,
            &["api", "v1", "university", "students", "get", "indexno", "all"],
        )
        .map_err(AppError::upstream)?;

        upstream
            .get_json(UNIVERSITY_SERVICE, url.as_str(), token)
            .await
            .map_err(AppError::upstream)
    }
}
