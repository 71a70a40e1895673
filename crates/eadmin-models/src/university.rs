//! Programs, courses, exams and their registrations.

use chrono::{DateTime, Utc};
use eadmin_core::PageMeta;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A grade of at least this value passes the exam.
pub const PASSING_GRADE: i32 = 6;
pub const MIN_GRADE: i32 = 1;
pub const MAX_GRADE: i32 = 10;

/// A curriculum; its `ects` is the graduation requirement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub ects: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProgramDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "ects must be positive"))]
    #[schema(example = 240)]
    pub ects: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub ects: i32,
    pub active: bool,
    pub programid: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, message = "code is required"))]
    #[schema(example = "OAS-101")]
    pub code: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "ects must be positive"))]
    pub ects: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    pub programid: Uuid,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, message = "code cannot be empty"))]
    pub code: Option<String>,
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "ects must be positive"))]
    pub ects: Option<i32>,
    pub active: Option<bool>,
    pub programid: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseRegistration {
    pub id: Uuid,
    pub courseid: Uuid,
    pub studentid: Uuid,
    pub createdat: DateTime<Utc>,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: Uuid,
    pub examtime: DateTime<Utc>,
    pub courseid: Uuid,
    pub professorid: Uuid,
}

/// The proctor is the professor creating the exam.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExamDto {
    pub examtime: DateTime<Utc>,
    pub courseid: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateExamDto {
    pub examtime: Option<DateTime<Utc>>,
    pub courseid: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamRegistration {
    pub id: Uuid,
    pub examid: Uuid,
    pub studentid: Uuid,
    pub createdat: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<i32>,
    pub passed: bool,
}

/// Grade entry body. `grade` may be a JSON number or a numeric string.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EnterGradeDto {
    pub studentid: Uuid,
    #[schema(value_type = String, example = "7")]
    pub grade: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeError {
    NotANumber,
    OutOfRange,
}

impl fmt::Display for GradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeError::NotANumber => f.write_str("grade must be a number"),
            GradeError::OutOfRange => write!(
                f,
                "grade must be between {} and {}",
                MIN_GRADE, MAX_GRADE
            ),
        }
    }
}

impl std::error::Error for GradeError {}

/// Reads a grade from `7`, `7.0` or `"7"`.
pub fn parse_grade(value: &Value) -> Result<i32, GradeError> {
    let raw = match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 && f.is_finite() => f as i64,
            _ => return Err(GradeError::NotANumber),
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| GradeError::NotANumber)?,
        _ => return Err(GradeError::NotANumber),
    };

    if !(i64::from(MIN_GRADE)..=i64::from(MAX_GRADE)).contains(&raw) {
        return Err(GradeError::OutOfRange);
    }

    Ok(raw as i32)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GradeResponse {
    #[serde(flatten)]
    pub registration: ExamRegistration,
    /// The student's accumulated ECTS after this grade.
    pub ects: i32,
    pub graduated: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProgramsPage {
    pub programs: Vec<Program>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CoursesPage {
    pub courses: Vec<Course>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseRegistrationsPage {
    pub courseregistrations: Vec<CourseRegistration>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExamsPage {
    pub exams: Vec<Exam>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExamRegistrationsPage {
    pub examregistrations: Vec<ExamRegistration>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grade_accepts_number_and_string() {
        assert_eq!(parse_grade(&json!(7)), Ok(7));
        assert_eq!(parse_grade(&json!("7")), Ok(7));
        assert_eq!(parse_grade(&json!(" 10 ")), Ok(10));
        assert_eq!(parse_grade(&json!(6.0)), Ok(6));
    }

    #[test]
    fn test_grade_rejects_non_numbers() {
        assert_eq!(parse_grade(&json!("seven")), Err(GradeError::NotANumber));
        assert_eq!(parse_grade(&json!(7.5)), Err(GradeError::NotANumber));
        assert_eq!(parse_grade(&json!(null)), Err(GradeError::NotANumber));
        assert_eq!(parse_grade(&json!([7])), Err(GradeError::NotANumber));
        assert_eq!(parse_grade(&json!(true)), Err(GradeError::NotANumber));
    }

    #[test]
    fn test_grade_bounds() {
        assert_eq!(parse_grade(&json!(1)), Ok(1));
        assert_eq!(parse_grade(&json!(0)), Err(GradeError::OutOfRange));
        assert_eq!(parse_grade(&json!("11")), Err(GradeError::OutOfRange));
        assert_eq!(parse_grade(&json!(-3)), Err(GradeError::OutOfRange));
    }

    #[test]
    fn test_grade_error_messages() {
        assert_eq!(GradeError::NotANumber.to_string(), "grade must be a number");
        assert_eq!(
            GradeError::OutOfRange.to_string(),
            "grade must be between 1 and 10"
        );
    }

    #[test]
    fn test_ungraded_registration_omits_grade() {
        let reg = ExamRegistration {
            id: Uuid::nil(),
            examid: Uuid::nil(),
            studentid: Uuid::nil(),
            createdat: Utc::now(),
            grade: None,
            passed: false,
        };
        let json = serde_json::to_value(&reg).unwrap();
        assert!(json.get("grade").is_none());
    }

    #[test]
    fn test_course_defaults_to_active() {
        let dto: CreateCourseDto = serde_json::from_value(json!({
            "code": "OAS-1",
            "name": "Algebra",
            "ects": 6,
            "programid": Uuid::nil(),
        }))
        .unwrap();
        assert!(dto.active);
    }
}
