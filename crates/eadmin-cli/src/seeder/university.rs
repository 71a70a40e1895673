//! Program and course seeding.

use fake::Fake;
use fake::faker::lorem::en::Words;
use rayon::prelude::*;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::CourseSeed;

pub const SEED_PROGRAM_NAME: &str = "Seeded Program";

const COURSE_ECTS: [i32; 3] = [4, 6, 8];

/// Creates (or reuses) the seeded program.
pub async fn seed_program(db: &PgPool, ects: i32) -> Result<Uuid, Box<dyn std::error::Error>> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO programs (name, ects) VALUES ($1, $2)
         ON CONFLICT (name) DO UPDATE SET ects = EXCLUDED.ects
         RETURNING id",
    )
    .bind(SEED_PROGRAM_NAME)
    .bind(ects)
    .fetch_one(db)
    .await?;

    Ok(id)
}

pub fn generate_courses(count: usize) -> Vec<CourseSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let words: Vec<String> = Words(2..4).fake();
            CourseSeed {
                code: format!("SEED-{:03}", idx + 1),
                name: words.join(" "),
                ects: COURSE_ECTS[idx % COURSE_ECTS.len()],
            }
        })
        .collect()
}

pub async fn insert_courses(
    db: &PgPool,
    program_id: Uuid,
    courses: &[CourseSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for course in courses {
        inserted += sqlx::query(
            "INSERT INTO courses (code, name, ects, programid) VALUES ($1, $2, $3, $4)
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(&course.code)
        .bind(&course.name)
        .bind(course.ects)
        .bind(program_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_codes_are_unique() {
        let courses = generate_courses(12);
        let mut codes: Vec<_> = courses.iter().map(|c| c.code.clone()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 12);
        assert!(courses.iter().all(|c| c.ects > 0));
    }
}
