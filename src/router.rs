//! Router assembly for the three services.
//!
//! | Service | Prefix |
//! |---------|--------|
//! | auth | `/api/v1/auth` |
//! | university | `/api/v1/university` |
//! | employment office | `/api/v1/employmentOffice` |
//!
//! Every service also serves `GET /health`, its own OpenAPI document under
//! `/swagger-ui` and `/scalar`, and the shared CORS, logging and metrics
//! layers. `/metrics` is merged by the binary, which owns the recorder.

use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiDocument;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use eadmin_config::{CorsConfig, ServiceKind};

use crate::docs::{AuthApiDoc, EmploymentApiDoc, UniversityApiDoc};
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::auth::init_auth_router;
use crate::modules::candidates::init_candidates_router;
use crate::modules::courses::init_courses_router;
use crate::modules::employees::init_employees_router;
use crate::modules::exams::init_exams_router;
use crate::modules::health::health;
use crate::modules::interviews::init_interviews_router;
use crate::modules::job_applications::init_job_applications_router;
use crate::modules::jobs::init_jobs_router;
use crate::modules::professors::init_professors_router;
use crate::modules::programs::init_programs_router;
use crate::modules::students::init_students_router;
use crate::state::AppState;

pub fn init_router(kind: ServiceKind, state: AppState) -> Router {
    match kind {
        ServiceKind::Auth => init_auth_service_router(state),
        ServiceKind::University => init_university_router(state),
        ServiceKind::EmploymentOffice => init_employment_router(state),
    }
}

pub fn init_auth_service_router(state: AppState) -> Router {
    let api = Router::new().nest("/auth", init_auth_router());
    finish(api, AuthApiDoc::openapi(), state)
}

pub fn init_university_router(state: AppState) -> Router {
    let api = Router::new().nest(
        "/university",
        Router::new()
            .nest("/professors", init_professors_router())
            .nest("/students", init_students_router())
            .nest("/programs", init_programs_router())
            .nest("/courses", init_courses_router())
            .nest("/exams", init_exams_router()),
    );
    finish(api, UniversityApiDoc::openapi(), state)
}

pub fn init_employment_router(state: AppState) -> Router {
    let api = Router::new().nest(
        "/employmentOffice",
        Router::new()
            .nest("/employees", init_employees_router())
            .nest("/candidates", init_candidates_router())
            .nest("/jobs", init_jobs_router())
            .nest("/jobapplications", init_job_applications_router())
            .nest("/interviews", init_interviews_router()),
    );
    finish(api, EmploymentApiDoc::openapi(), state)
}

fn finish(api: Router<AppState>, doc: OpenApiDocument, state: AppState) -> Router {
    let cors = cors_layer(&state.cors_config);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc.clone()))
        .merge(Scalar::with_url("/scalar", doc))
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
