pub mod controller;
pub mod router;
pub mod service;

pub use router::init_job_applications_router;
