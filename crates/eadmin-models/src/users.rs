//! Role-specific views of the `users` table.
//!
//! Professors, students, employees and candidates all live in one table;
//! each view selects the columns that matter for its role.

use chrono::{DateTime, Utc};
use eadmin_core::PageMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Graduated,
    Suspended,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "ACTIVE",
            StudentStatus::Graduated => "GRADUATED",
            StudentStatus::Suspended => "SUSPENDED",
        }
    }
}

/// Any account, regardless of role.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub role: String,
    pub indexno: Option<String>,
    pub jobid: Option<Uuid>,
    pub ects: i32,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Professor {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub indexno: Option<String>,
    pub ects: i32,
    #[schema(example = "ACTIVE")]
    pub status: Option<String>,
}

/// A student in the list endpoint, enriched with the employment office's view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentListItem {
    #[serde(flatten)]
    pub student: Student,
    pub employed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentAvgGrade {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub indexno: Option<String>,
    pub ects: i32,
    pub status: Option<String>,
    /// Mean of the student's entered grades, `null` when none exist.
    pub avggrade: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub indexno: Option<String>,
    pub jobid: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Candidate {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub indexno: Option<String>,
    pub jobid: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProfessorDto {
    #[validate(length(min = 1, message = "fullname is required"))]
    pub fullname: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfessorDto {
    #[validate(length(min = 1, message = "fullname cannot be empty"))]
    pub fullname: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, message = "fullname is required"))]
    pub fullname: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "indexno is required"))]
    #[schema(example = "RA-12/2021")]
    pub indexno: String,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, message = "fullname cannot be empty"))]
    pub fullname: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "indexno cannot be empty"))]
    pub indexno: Option<String>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployeeDto {
    #[validate(length(min = 1, message = "fullname is required"))]
    pub fullname: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub indexno: Option<String>,
    pub jobid: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployeeDto {
    #[validate(length(min = 1, message = "fullname cannot be empty"))]
    pub fullname: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    pub indexno: Option<String>,
    pub jobid: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCandidateDto {
    #[validate(length(min = 1, message = "fullname is required"))]
    pub fullname: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub indexno: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCandidateDto {
    #[validate(length(min = 1, message = "fullname cannot be empty"))]
    pub fullname: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    pub indexno: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmployedResponse {
    pub indexno: String,
    pub employed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct IndicesResponse {
    pub indices: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct IndicesRequest {
    #[serde(default)]
    pub indices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GraduationResponse {
    pub student: Student,
    pub status: bool,
}

/// The one field the employment office reads from a graduation check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraduationCheck {
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfessorsPage {
    pub professors: Vec<Professor>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentsPage {
    pub students: Vec<StudentListItem>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeesPage {
    pub employees: Vec<Employee>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CandidatesPage {
    pub candidates: Vec<Candidate>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_status_wire_format() {
        let status: StudentStatus = serde_json::from_str("\"GRADUATED\"").unwrap();
        assert_eq!(status, StudentStatus::Graduated);
        assert_eq!(status.as_str(), "GRADUATED");
        assert!(serde_json::from_str::<StudentStatus>("\"graduated\"").is_err());
    }

    #[test]
    fn test_student_list_item_flattens() {
        let item = StudentListItem {
            student: Student {
                id: Uuid::nil(),
                fullname: "Mika".to_string(),
                email: "mika@uni.rs".to_string(),
                indexno: Some("RA-1/2020".to_string()),
                ects: 12,
                status: Some("ACTIVE".to_string()),
            },
            employed: true,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["indexno"], "RA-1/2020");
        assert_eq!(json["employed"], true);
    }

    #[test]
    fn test_page_flattens_meta() {
        let page = ProfessorsPage {
            professors: vec![],
            meta: PageMeta::new(1, 10, 0),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalItems"], 0);
        assert!(json["professors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_create_student_validation() {
        let dto = CreateStudentDto {
            fullname: String::new(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            indexno: "RA-1/2020".to_string(),
            status: None,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("fullname"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("indexno"));
    }

    #[test]
    fn test_graduation_check_ignores_other_fields() {
        let check: GraduationCheck =
            serde_json::from_str(r#"{"student":{"id":"x"},"status":true}"#).unwrap();
        assert!(check.status);
    }
}
