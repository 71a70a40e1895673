//! Account seeding.

use eadmin_auth::Role;
use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};

use super::models::{SEED_EMAIL_DOMAIN, UserSeed};

/// Generates `count` accounts of one role.
///
/// Students get an index number and `ACTIVE` status; candidates get an index
/// number only.
pub fn generate_users(role: Role, count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();

            let email = format!(
                "{}.{}+{}{}@{}",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                role,
                idx,
                SEED_EMAIL_DOMAIN
            );

            let (indexno, status) = match role {
                Role::Student => (Some(format!("S-{}/2024", idx + 1)), Some("ACTIVE")),
                Role::Candidate => (Some(format!("C-{}/2020", idx + 1)), None),
                _ => (None, None),
            };

            UserSeed {
                fullname: format!("{} {}", first_name, last_name),
                email,
                password_hash: password_hash.to_string(),
                role,
                indexno,
                status,
            }
        })
        .collect()
}

/// Inserts users in batches and returns how many rows were written.
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 6 params per user
    const BATCH_SIZE: usize = 1000;

    let mut inserted = 0;
    for chunk in users.chunks(BATCH_SIZE) {
        inserted += insert_users_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(0);
    }

    let mut query =
        String::from("INSERT INTO users (fullname, email, password, role, indexno, status) VALUES ");

    for (i, _) in users.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4,
            param_idx + 5,
            param_idx + 6
        ));
    }

    query.push_str(" ON CONFLICT DO NOTHING");

    let mut q = sqlx::query(&query);
    for user in users {
        q = q
            .bind(&user.fullname)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.indexno)
            .bind(user.status);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_students_have_index_numbers() {
        let users = generate_users(Role::Student, 3, "hash");
        assert_eq!(users.len(), 3);
        assert!(users.iter().all(|u| u.indexno.is_some()));
        assert!(users.iter().all(|u| u.status == Some("ACTIVE")));
        assert!(users.iter().all(|u| u.email.ends_with(SEED_EMAIL_DOMAIN)));
    }

    #[test]
    fn test_generated_professors_have_no_index() {
        let users = generate_users(Role::Professor, 2, "hash");
        assert!(users.iter().all(|u| u.indexno.is_none() && u.status.is_none()));
    }
}
