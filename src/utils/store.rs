use anyhow::{Context, anyhow};
use sqlx::PgPool;
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::AppError;
use eadmin_db::{is_foreign_key_violation, is_unique_violation};

/// Maps a failed write: unique violations become 409 with `conflict`,
/// everything else a 500 carrying `context`.
pub fn write_error(err: sqlx::Error, conflict: &'static str, context: &'static str) -> AppError {
    if is_unique_violation(&err) {
        return AppError::conflict(anyhow!(conflict));
    }
    AppError::database(anyhow::Error::new(err).context(context))
}

/// Like [`write_error`], but a missing referenced row is reported as 404.
pub fn write_error_with_reference(
    err: sqlx::Error,
    conflict: &'static str,
    missing: &'static str,
    context: &'static str,
) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::not_found(anyhow!(missing));
    }
    write_error(err, conflict, context)
}

/// Emails are stored lowercased and trimmed.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// The id of the account with `email` and `role`, if any.
pub async fn user_id_by_email(
    db: &PgPool,
    email: &str,
    role: Role,
) -> Result<Option<Uuid>, AppError> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM users WHERE LOWER(email) = LOWER($1) AND role = $2",
    )
    .bind(email.trim())
    .bind(role.as_str())
    .fetch_optional(db)
    .await
    .context("Failed to look up user by email")
    .map_err(AppError::database)
}

/// Total number of accounts with `role`.
pub async fn count_role(db: &PgPool, role: Role) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(role.as_str())
        .fetch_one(db)
        .await
        .context("Failed to count users")
        .map_err(AppError::database)
}
