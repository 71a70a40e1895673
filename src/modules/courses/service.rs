use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageMeta, PageParams};
use eadmin_models::university::{
    Course, CourseRegistration, CourseRegistrationsPage, CoursesPage, CreateCourseDto,
    UpdateCourseDto,
};

use crate::utils::store::{user_id_by_email, write_error, write_error_with_reference};

pub const COURSE_EXISTS: &str = "course code already exists";
pub const ALREADY_REGISTERED: &str = "already registered for this course";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (code, name, ects, active, programid)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, code, name, ects, active, programid"#,
        )
        .bind(dto.code.trim())
        .bind(dto.name.trim())
        .bind(dto.ects)
        .bind(dto.active)
        .bind(dto.programid)
        .fetch_one(db)
        .await
        .map_err(|e| {
            write_error_with_reference(
                e,
                COURSE_EXISTS,
                "program not found",
                "Failed to create course",
            )
        })
    }

    #[instrument(skip(db))]
    pub async fn get_courses(db: &PgPool, params: &PageParams) -> Result<CoursesPage, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await
            .context("Failed to count courses")
            .map_err(AppError::database)?;

        let courses = sqlx::query_as::<_, Course>(
            r#"SELECT id, code, name, ects, active, programid FROM courses
               ORDER BY code, id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch courses")
        .map_err(AppError::database)?;

        Ok(CoursesPage {
            courses,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: Uuid) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            "SELECT id, code, name, ects, active, programid FROM courses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch course")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("course not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::get_course(db, id).await?;

        let code = dto
            .code
            .map(|code| code.trim().to_string())
            .unwrap_or(existing.code);
        let name = dto
            .name
            .map(|name| name.trim().to_string())
            .unwrap_or(existing.name);
        let ects = dto.ects.unwrap_or(existing.ects);
        let active = dto.active.unwrap_or(existing.active);
        let programid = dto.programid.unwrap_or(existing.programid);

        sqlx::query_as::<_, Course>(
            r#"UPDATE courses SET code = $1, name = $2, ects = $3, active = $4, programid = $5
               WHERE id = $6
               RETURNING id, code, name, ects, active, programid"#,
        )
        .bind(&code)
        .bind(&name)
        .bind(ects)
        .bind(active)
        .bind(programid)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            write_error_with_reference(
                e,
                COURSE_EXISTS,
                "program not found",
                "Failed to update course",
            )
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete course")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("course not found")));
        }

        Ok(())
    }

    /// Registers the student behind `email` for a course.
    ///
    /// The existence check only produces the message; concurrent duplicates
    /// are stopped by `course_registrations_course_student_key`.
    #[instrument(skip(db))]
    pub async fn register_for_course(
        db: &PgPool,
        course_id: Uuid,
        email: &str,
    ) -> Result<CourseRegistration, AppError> {
        Self::get_course(db, course_id).await?;

        let student_id = user_id_by_email(db, email, Role::Student)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("student not found")))?;

        let already_registered = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                   SELECT 1 FROM course_registrations WHERE courseid = $1 AND studentid = $2
               )"#,
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_one(db)
        .await
        .context("Failed to check course registration")
        .map_err(AppError::database)?;

        if already_registered {
            return Err(AppError::conflict(anyhow!(ALREADY_REGISTERED)));
        }

        sqlx::query_as::<_, CourseRegistration>(
            r#"INSERT INTO course_registrations (courseid, studentid)
               VALUES ($1, $2)
               RETURNING id, courseid, studentid, createdat, passed"#,
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, ALREADY_REGISTERED, "Failed to register for course"))
    }

    #[instrument(skip(db))]
    pub async fn get_my_registrations(
        db: &PgPool,
        email: &str,
        params: &PageParams,
    ) -> Result<CourseRegistrationsPage, AppError> {
        let student_id = user_id_by_email(db, email, Role::Student)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("student not found")))?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM course_registrations WHERE studentid = $1",
        )
        .bind(student_id)
        .fetch_one(db)
        .await
        .context("Failed to count course registrations")
        .map_err(AppError::database)?;

        let courseregistrations = sqlx::query_as::<_, CourseRegistration>(
            r#"SELECT id, courseid, studentid, createdat, passed
               FROM course_registrations
               WHERE studentid = $1
               ORDER BY createdat DESC, id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(student_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch course registrations")
        .map_err(AppError::database)?;

        Ok(CourseRegistrationsPage {
            courseregistrations,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }
}
