//! Fake data for local development.
//!
//! Generation runs on the rayon pool; inserts are batched inside one
//! transaction per table.

mod models;
mod university;
mod users;

use eadmin_core::hash_password;
use sqlx::PgPool;
use std::time::Instant;

pub use models::{CourseSeed, SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig, UserSeed};
pub use university::{generate_courses, seed_program};
pub use users::{generate_users, insert_users_batch};

use eadmin_auth::Role;

pub async fn seed_database(
    db: &PgPool,
    config: SeedConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let groups = [
        (Role::Professor, config.professors),
        (Role::Student, config.students),
        (Role::Candidate, config.candidates),
        (Role::Employee, config.employees),
    ];

    for (role, count) in groups {
        if count == 0 {
            continue;
        }
        let users = generate_users(role, count, &password_hash);
        let inserted = insert_users_batch(db, &users).await?;
        println!("   ✓ Inserted {} {} accounts", inserted, role);
    }

    if config.courses > 0 {
        let program_id = seed_program(db, config.program_ects).await?;
        let courses = generate_courses(config.courses);
        let inserted = university::insert_courses(db, program_id, &courses).await?;
        println!("   ✓ Inserted {} courses", inserted);
    }

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    println!("   Every seeded account uses the password '{}'", SEED_PASSWORD);

    Ok(())
}

/// Removes every seeded account and the seeded program.
pub async fn clear_seeded_data(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;
    let pattern = format!("%@{}", SEED_EMAIL_DOMAIN);

    sqlx::query(
        "DELETE FROM exams WHERE professorid IN (SELECT id FROM users WHERE email LIKE $1)",
    )
    .bind(&pattern)
    .execute(&mut *tx)
    .await?;

    let users = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(&pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let courses = sqlx::query(
        "DELETE FROM courses WHERE programid IN (SELECT id FROM programs WHERE name = $1)",
    )
    .bind(university::SEED_PROGRAM_NAME)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query("DELETE FROM programs WHERE name = $1")
        .bind(university::SEED_PROGRAM_NAME)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} users and {} courses in {:?}",
        users,
        courses,
        start_time.elapsed()
    );

    Ok(())
}
