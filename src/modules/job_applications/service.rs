use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use eadmin_core::{AppError, PageMeta, PageParams};
use eadmin_models::employment::{JobApplication, JobApplicationsPage};

pub struct JobApplicationService;

impl JobApplicationService {
    #[instrument(skip(db))]
    pub async fn get_job_applications(
        db: &PgPool,
        params: &PageParams,
    ) -> Result<JobApplicationsPage, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_applications")
            .fetch_one(db)
            .await
            .context("Failed to count job applications")
            .map_err(AppError::database)?;

        let jobapplications = sqlx::query_as::<_, JobApplication>(
            r#"SELECT id, jobid, candidateid, createdat FROM job_applications
               ORDER BY createdat DESC, id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch job applications")
        .map_err(AppError::database)?;

        Ok(JobApplicationsPage {
            jobapplications,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_job_application(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete job application")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("job application not found")));
        }

        Ok(())
    }
}
