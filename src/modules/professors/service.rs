use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageMeta, PageParams, hash_password};
use eadmin_db::is_foreign_key_violation;
use eadmin_models::users::{CreateProfessorDto, Professor, ProfessorsPage, UpdateProfessorDto};

use crate::utils::store::{count_role, normalize_email, write_error};

pub const EMAIL_EXISTS: &str = "email already exists";

pub struct ProfessorService;

impl ProfessorService {
    #[instrument(skip(db, dto))]
    pub async fn create_professor(
        db: &PgPool,
        dto: CreateProfessorDto,
    ) -> Result<Professor, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        sqlx::query_as::<_, Professor>(
            r#"INSERT INTO users (fullname, email, password, role)
               VALUES ($1, $2, $3, 'professor')
               RETURNING id, fullname, email"#,
        )
        .bind(dto.fullname.trim())
        .bind(normalize_email(&dto.email))
        .bind(&hashed_password)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, EMAIL_EXISTS, "Failed to create professor"))
    }

    #[instrument(skip(db))]
    pub async fn get_professors(
        db: &PgPool,
        params: &PageParams,
    ) -> Result<ProfessorsPage, AppError> {
        let total = count_role(db, Role::Professor).await?;

        let professors = sqlx::query_as::<_, Professor>(
            r#"SELECT id, fullname, email FROM users
               WHERE role = 'professor'
               ORDER BY fullname, id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch professors")
        .map_err(AppError::database)?;

        Ok(ProfessorsPage {
            professors,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_professor(db: &PgPool, id: Uuid) -> Result<Professor, AppError> {
        sqlx::query_as::<_, Professor>(
            "SELECT id, fullname, email FROM users WHERE id = $1 AND role = 'professor'",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch professor")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("professor not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_professor_by_email(db: &PgPool, email: &str) -> Result<Professor, AppError> {
        sqlx::query_as::<_, Professor>(
            r#"SELECT id, fullname, email FROM users
               WHERE LOWER(email) = LOWER($1) AND role = 'professor'"#,
        )
        .bind(email.trim())
        .fetch_optional(db)
        .await
        .context("Failed to fetch professor by email")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("professor not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_professor(
        db: &PgPool,
        id: Uuid,
        dto: UpdateProfessorDto,
    ) -> Result<Professor, AppError> {
        let existing = Self::get_professor(db, id).await?;

        let fullname = dto
            .fullname
            .map(|name| name.trim().to_string())
            .unwrap_or(existing.fullname);
        let email = dto
            .email
            .map(|email| normalize_email(&email))
            .unwrap_or(existing.email);

        sqlx::query_as::<_, Professor>(
            r#"UPDATE users SET fullname = $1, email = $2
               WHERE id = $3 AND role = 'professor'
               RETURNING id, fullname, email"#,
        )
        .bind(&fullname)
        .bind(&email)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, EMAIL_EXISTS, "Failed to update professor"))
    }

    /// Professors who still proctor exams cannot be removed.
    #[instrument(skip(db))]
    pub async fn delete_professor(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'professor'")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::conflict(anyhow!("professor still proctors exams"));
                }
                AppError::database(anyhow::Error::new(e).context("Failed to delete professor"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("professor not found")));
        }

        Ok(())
    }
}
