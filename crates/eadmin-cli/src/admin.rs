use eadmin_auth::Role;
use eadmin_core::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

/// Inserts an administrator account.
///
/// `role` must be one of the administrative roles.
pub async fn create_admin(
    db: &PgPool,
    fullname: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Uuid, Box<dyn std::error::Error>> {
    if !role.is_admin() {
        return Err(format!("{} is not an administrative role", role).into());
    }

    let fullname = fullname.trim();
    let email = email.trim().to_lowercase();
    if fullname.is_empty() || email.is_empty() || password.is_empty() {
        return Err("full name, email and password are required".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (fullname, email, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(fullname)
    .bind(&email)
    .bind(&hashed_password)
    .bind(role.as_str())
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "User with this email already exists".into())
}
