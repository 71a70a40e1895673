use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    apply_for_job, create_job, delete_job, get_job, get_job_candidates, get_jobs, update_job,
};
use crate::state::AppState;

pub fn init_jobs_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_job).get(get_jobs))
        .route("/{id}", get(get_job).put(update_job).delete(delete_job))
        .route("/{id}/candidates", get(get_job_candidates))
        .route("/{id}/{email}/apply", post(apply_for_job))
}
