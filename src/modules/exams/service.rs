use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use eadmin_auth::Role;
use eadmin_core::{AppError, PageMeta, PageParams};
use eadmin_models::university::{
    CreateExamDto, EnterGradeDto, Exam, ExamRegistration, ExamRegistrationsPage, ExamsPage,
    GradeResponse, PASSING_GRADE, UpdateExamDto, parse_grade,
};
use eadmin_models::users::StudentStatus;

use crate::metrics::{track_grade_entered, track_graduation};
use crate::utils::store::{user_id_by_email, write_error, write_error_with_reference};

pub const COURSE_REGISTRATION_REQUIRED: &str = "you must be registered for the exam's course";
pub const ALREADY_REGISTERED: &str = "already registered for this exam";
pub const GRADE_ALREADY_ENTERED: &str = "grade already entered";

pub struct ExamService;

impl ExamService {
    /// Schedules an exam proctored by the professor behind `email`.
    #[instrument(skip(db, dto))]
    pub async fn create_exam(
        db: &PgPool,
        email: &str,
        dto: CreateExamDto,
    ) -> Result<Exam, AppError> {
        let professor_id = user_id_by_email(db, email, Role::Professor)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("professor not found")))?;

        sqlx::query_as::<_, Exam>(
            r#"INSERT INTO exams (examtime, courseid, professorid)
               VALUES ($1, $2, $3)
               RETURNING id, examtime, courseid, professorid"#,
        )
        .bind(dto.examtime)
        .bind(dto.courseid)
        .bind(professor_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            write_error_with_reference(
                e,
                "exam already exists",
                "course not found",
                "Failed to create exam",
            )
        })
    }

    #[instrument(skip(db))]
    pub async fn get_exams(db: &PgPool, params: &PageParams) -> Result<ExamsPage, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM exams")
            .fetch_one(db)
            .await
            .context("Failed to count exams")
            .map_err(AppError::database)?;

        let exams = sqlx::query_as::<_, Exam>(
            r#"SELECT id, examtime, courseid, professorid FROM exams
               ORDER BY examtime, id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch exams")
        .map_err(AppError::database)?;

        Ok(ExamsPage {
            exams,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_exam(db: &PgPool, id: Uuid) -> Result<Exam, AppError> {
        sqlx::query_as::<_, Exam>(
            "SELECT id, examtime, courseid, professorid FROM exams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch exam")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("exam not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_exam(db: &PgPool, id: Uuid, dto: UpdateExamDto) -> Result<Exam, AppError> {
        let existing = Self::get_exam(db, id).await?;

        let examtime = dto.examtime.unwrap_or(existing.examtime);
        let courseid = dto.courseid.unwrap_or(existing.courseid);

        sqlx::query_as::<_, Exam>(
            r#"UPDATE exams SET examtime = $1, courseid = $2
               WHERE id = $3
               RETURNING id, examtime, courseid, professorid"#,
        )
        .bind(examtime)
        .bind(courseid)
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            write_error_with_reference(
                e,
                "exam already exists",
                "course not found",
                "Failed to update exam",
            )
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_exam(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete exam")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("exam not found")));
        }

        Ok(())
    }

    /// Registers the student behind `email` for an exam of a course they
    /// are registered for.
    #[instrument(skip(db))]
    pub async fn register_for_exam(
        db: &PgPool,
        exam_id: Uuid,
        email: &str,
    ) -> Result<ExamRegistration, AppError> {
        let exam = Self::get_exam(db, exam_id).await?;

        let student_id = user_id_by_email(db, email, Role::Student)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("student not found")))?;

        let (course_registered, exam_registered) = sqlx::query_as::<_, (bool, bool)>(
            r#"SELECT
                   EXISTS(SELECT 1 FROM course_registrations
                          WHERE courseid = $1 AND studentid = $3),
                   EXISTS(SELECT 1 FROM exam_registrations
                          WHERE examid = $2 AND studentid = $3)"#,
        )
        .bind(exam.courseid)
        .bind(exam.id)
        .bind(student_id)
        .fetch_one(db)
        .await
        .context("Failed to check registrations")
        .map_err(AppError::database)?;

        if !course_registered {
            return Err(AppError::bad_request(anyhow!(COURSE_REGISTRATION_REQUIRED)));
        }
        if exam_registered {
            return Err(AppError::conflict(anyhow!(ALREADY_REGISTERED)));
        }

        sqlx::query_as::<_, ExamRegistration>(
            r#"INSERT INTO exam_registrations (examid, studentid)
               VALUES ($1, $2)
               RETURNING id, examid, studentid, createdat, grade, passed"#,
        )
        .bind(exam.id)
        .bind(student_id)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, ALREADY_REGISTERED, "Failed to register for exam"))
    }

    #[instrument(skip(db))]
    pub async fn get_my_registrations(
        db: &PgPool,
        email: &str,
        params: &PageParams,
    ) -> Result<ExamRegistrationsPage, AppError> {
        let student_id = user_id_by_email(db, email, Role::Student)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("student not found")))?;

        Self::registrations_where(db, "studentid", student_id, params).await
    }

    #[instrument(skip(db))]
    pub async fn get_exam_registrations(
        db: &PgPool,
        exam_id: Uuid,
        params: &PageParams,
    ) -> Result<ExamRegistrationsPage, AppError> {
        Self::get_exam(db, exam_id).await?;
        Self::registrations_where(db, "examid", exam_id, params).await
    }

    async fn registrations_where(
        db: &PgPool,
        column: &'static str,
        id: Uuid,
        params: &PageParams,
    ) -> Result<ExamRegistrationsPage, AppError> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM exam_registrations WHERE {column} = $1"
        ))
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to count exam registrations")
        .map_err(AppError::database)?;

        let examregistrations = sqlx::query_as::<_, ExamRegistration>(&format!(
            r#"SELECT id, examid, studentid, createdat, grade, passed
               FROM exam_registrations
               WHERE {column} = $1
               ORDER BY createdat DESC, id
               LIMIT $2 OFFSET $3"#
        ))
        .bind(id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch exam registrations")
        .map_err(AppError::database)?;

        Ok(ExamRegistrationsPage {
            examregistrations,
            meta: PageMeta::new(params.page(), params.limit(), total),
        })
    }

    /// Enters a grade, once, and accrues the course's ECTS on a pass.
    ///
    /// Runs in one transaction with the exam registration row locked. The
    /// ECTS increment is a single `UPDATE`. A course counts once even if the
    /// student passes several of its exams, and nothing here moves a student
    /// out of `GRADUATED`.
    #[instrument(skip(db, dto), fields(studentid = %dto.studentid))]
    pub async fn enter_grade(
        db: &PgPool,
        exam_id: Uuid,
        dto: EnterGradeDto,
    ) -> Result<GradeResponse, AppError> {
        let grade = parse_grade(&dto.grade).map_err(AppError::bad_request)?;
        let passed = grade >= PASSING_GRADE;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let registration = sqlx::query_as::<_, ExamRegistration>(
            r#"SELECT id, examid, studentid, createdat, grade, passed
               FROM exam_registrations
               WHERE examid = $1 AND studentid = $2
               FOR UPDATE"#,
        )
        .bind(exam_id)
        .bind(dto.studentid)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock exam registration")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("exam registration not found")))?;

        if registration.grade.is_some() {
            return Err(AppError::conflict(anyhow!(GRADE_ALREADY_ENTERED)));
        }

        let registration = sqlx::query_as::<_, ExamRegistration>(
            r#"UPDATE exam_registrations SET grade = $1, passed = $2
               WHERE id = $3
               RETURNING id, examid, studentid, createdat, grade, passed"#,
        )
        .bind(grade)
        .bind(passed)
        .bind(registration.id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to store grade")
        .map_err(AppError::database)?;

        let mut newly_graduated = false;

        if passed {
            let (course_id, course_ects, program_ects) = sqlx::query_as::<_, (Uuid, i32, i32)>(
                r#"SELECT c.id, c.ects, p.ects
                   FROM exams e
                   JOIN courses c ON c.id = e.courseid
                   JOIN programs p ON p.id = c.programid
                   WHERE e.id = $1"#,
            )
            .bind(exam_id)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to load the exam's course")
            .map_err(AppError::database)?;

            let course_passed = sqlx::query(
                r#"UPDATE course_registrations SET passed = TRUE
                   WHERE courseid = $1 AND studentid = $2 AND NOT passed"#,
            )
            .bind(course_id)
            .bind(dto.studentid)
            .execute(&mut *tx)
            .await
            .context("Failed to mark course as passed")
            .map_err(AppError::database)?
            .rows_affected()
                > 0;

            if course_passed {
                let (ects, status) = sqlx::query_as::<_, (i32, Option<String>)>(
                    "UPDATE users SET ects = ects + $1 WHERE id = $2 RETURNING ects, status",
                )
                .bind(course_ects)
                .bind(dto.studentid)
                .fetch_one(&mut *tx)
                .await
                .context("Failed to accrue ECTS")
                .map_err(AppError::database)?;

                let graduated = status.as_deref() == Some(StudentStatus::Graduated.as_str());
                if ects >= program_ects && !graduated {
                    sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
                        .bind(StudentStatus::Graduated.as_str())
                        .bind(dto.studentid)
                        .execute(&mut *tx)
                        .await
                        .context("Failed to mark student as graduated")
                        .map_err(AppError::database)?;
                    newly_graduated = true;
                }
            }
        }

        let (ects, status) = sqlx::query_as::<_, (i32, Option<String>)>(
            "SELECT ects, status FROM users WHERE id = $1",
        )
        .bind(dto.studentid)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to load student")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit grade")
            .map_err(AppError::database)?;

        track_grade_entered(passed);
        if newly_graduated {
            track_graduation();
            info!(studentid = %dto.studentid, ects, "student graduated");
        }

        Ok(GradeResponse {
            registration,
            ects,
            graduated: status.as_deref() == Some(StudentStatus::Graduated.as_str()),
        })
    }
}
