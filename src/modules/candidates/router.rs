use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_candidate, delete_candidate, get_candidate, get_candidate_by_email, get_candidates,
    get_university_indices, update_candidate,
};
use crate::state::AppState;

pub fn init_candidates_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_candidate).get(get_candidates))
        .route("/by-email", get(get_candidate_by_email))
        .route("/get/indexno/all", get(get_university_indices))
        .route(
            "/{id}",
            get(get_candidate).put(update_candidate).delete(delete_candidate),
        )
}
