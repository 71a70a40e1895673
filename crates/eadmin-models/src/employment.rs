//! Jobs, applications and interviews of the employment office.

use chrono::{DateTime, Utc};
use eadmin_core::PageMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Job {
    pub id: Uuid,
    pub employerid: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Applicants must have graduated
    pub requiredfaculty: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateJobDto {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub requiredfaculty: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateJobDto {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub requiredfaculty: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct JobApplication {
    pub id: Uuid,
    pub jobid: Uuid,
    pub candidateid: Uuid,
    pub createdat: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewStatus {
    Scheduled,
    Accepted,
    Rejected,
    Hired,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "SCHEDULED",
            InterviewStatus::Accepted => "ACCEPTED",
            InterviewStatus::Rejected => "REJECTED",
            InterviewStatus::Hired => "HIRED",
        }
    }

    /// Open interviews still block a new one for the same job and candidate.
    pub fn is_open(&self) -> bool {
        matches!(self, InterviewStatus::Scheduled | InterviewStatus::Accepted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Interview {
    pub id: Uuid,
    pub jobapplicationid: Option<Uuid>,
    pub candidateid: Uuid,
    pub jobid: Uuid,
    pub datetime: DateTime<Utc>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    #[schema(example = "online")]
    pub interview_type: String,
    pub location: String,
    #[schema(example = "SCHEDULED")]
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScheduleInterviewDto {
    pub jobapplicationid: Uuid,
    pub candidateid: Uuid,
    pub jobid: Uuid,
    pub datetime: DateTime<Utc>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    pub interview_type: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HireResponse {
    pub candidateid: Uuid,
    pub jobid: Uuid,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobsPage {
    pub jobs: Vec<Job>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobApplicationsPage {
    pub jobapplications: Vec<JobApplication>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InterviewsPage {
    pub interviews: Vec<Interview>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interview_type_field_name() {
        let dto: ScheduleInterviewDto = serde_json::from_value(json!({
            "jobapplicationid": Uuid::nil(),
            "candidateid": Uuid::nil(),
            "jobid": Uuid::nil(),
            "datetime": "2025-05-01T10:00:00Z",
            "type": "onsite",
        }))
        .unwrap();
        assert_eq!(dto.interview_type, "onsite");
        assert!(dto.location.is_empty());
    }

    #[test]
    fn test_open_statuses() {
        assert!(InterviewStatus::Scheduled.is_open());
        assert!(InterviewStatus::Accepted.is_open());
        assert!(!InterviewStatus::Rejected.is_open());
        assert!(!InterviewStatus::Hired.is_open());
        assert_eq!(InterviewStatus::Hired.as_str(), "HIRED");
    }

    #[test]
    fn test_job_defaults() {
        let dto: CreateJobDto = serde_json::from_value(json!({"title": "Backend dev"})).unwrap();
        assert!(!dto.requiredfaculty);
        assert!(dto.validate().is_ok());
    }
}
