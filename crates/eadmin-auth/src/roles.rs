//! The closed set of identity roles.
//!
//! Roles travel as lowercase strings in tokens, in the `users.role` column and
//! in the verify endpoint's response.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
    Employee,
    Candidate,
    /// Faculty administrator (university records)
    FacultyAdmin,
    /// Employment office administrator
    SszAdmin,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Student,
        Role::Professor,
        Role::Employee,
        Role::Candidate,
        Role::FacultyAdmin,
        Role::SszAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Professor => "professor",
            Role::Employee => "employee",
            Role::Candidate => "candidate",
            Role::FacultyAdmin => "facultyadmin",
            Role::SszAdmin => "sszadmin",
        }
    }

    /// Administrative roles are provisioned out of band, never self-registered.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::FacultyAdmin | Role::SszAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == needle)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
