use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use eadmin_core::{AppError, PageMeta, PageParams};
use eadmin_models::university::{CreateProgramDto, Program, ProgramsPage};

use crate::utils::store::write_error;

pub struct ProgramService;

impl ProgramService {
    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_program(db: &PgPool, dto: CreateProgramDto) -> Result<Program, AppError> {
        sqlx::query_as::<_, Program>(
            "INSERT INTO programs (name, ects) VALUES ($1, $2) RETURNING id, name, ects",
        )
        .bind(dto.name.trim())
        .bind(dto.ects)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, "program already exists", "Failed to create program"))
    }

    #[instrument(skip(db))]
    pub async fn get_programs(db: &PgPool, params: &PageParams) -> Result<ProgramsPage, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM programs")
            .fetch_one(db)
            .await
            .context("Failed to count programs")
            .map_err(AppError::database)?;

        let programs = sqlx::query_as::<_, Program>(
            "SELECT id, name, ects FROM programs ORDER BY name, id LIMIT $1 OFFSET $2",
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch programs")
        .map_err(AppError::database)?;

        Ok(ProgramsPage {
            programs,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_program(db: &PgPool, id: Uuid) -> Result<Program, AppError> {
        sqlx::query_as::<_, Program>("SELECT id, name, ects FROM programs WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch program")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("program not found")))
    }
}
