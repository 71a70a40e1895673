use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{delete_job_application, get_job_applications};
use crate::state::AppState;

pub fn init_job_applications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_job_applications))
        .route("/{id}", delete(delete_job_application))
}
