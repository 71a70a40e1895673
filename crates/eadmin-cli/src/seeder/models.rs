//! Seeding configuration and row templates.

use eadmin_auth::Role;

/// Seed data for one `users` row.
pub struct UserSeed {
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub indexno: Option<String>,
    pub status: Option<&'static str>,
}

/// Seed data for one course.
pub struct CourseSeed {
    pub code: String,
    pub name: String,
    pub ects: i32,
}

/// How many rows of each kind to generate.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub professors: usize,
    pub students: usize,
    pub candidates: usize,
    pub employees: usize,
    pub courses: usize,
    /// ECTS required to graduate from the seeded program
    pub program_ects: i32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            professors: 5,
            students: 50,
            candidates: 20,
            employees: 5,
            courses: 40,
            program_ects: 240,
        }
    }
}

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password123";

/// Seeded emails end with this suffix so they can be cleared again.
pub const SEED_EMAIL_DOMAIN: &str = "seed.eadmin.test";
