//! # eAdministration Models
//!
//! Database rows, request DTOs and response shapes shared by the three
//! services.
//!
//! JSON field names follow the column names (`fullname`, `indexno`,
//! `studentid`, ...), except for the auth endpoints, which speak
//! `fullName`.
//!
//! # Modules
//!
//! - [`auth`]: register, login, verify and authorize payloads
//! - [`common`]: error and health bodies
//! - [`employment`]: jobs, applications and interviews
//! - [`university`]: programs, courses, exams, registrations and grades
//! - [`users`]: role-specific views of the `users` table

pub mod auth;
pub mod common;
pub mod employment;
pub mod university;
pub mod users;

pub use auth::{AuthResponse, AuthUserResponse, LoginRequest, RegisterRequest};
pub use common::{ErrorResponse, HealthResponse};
pub use users::StudentStatus;
