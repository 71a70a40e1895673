//! Feature modules.
//!
//! Each module carries a `controller` (handlers), a `service` (store and
//! relay logic) and a `router`. Which modules a process mounts depends on
//! the service it runs as, see [`crate::router`].

pub mod auth;
pub mod candidates;
pub mod courses;
pub mod employees;
pub mod exams;
pub mod health;
pub mod interviews;
pub mod job_applications;
pub mod jobs;
pub mod professors;
pub mod programs;
pub mod students;
