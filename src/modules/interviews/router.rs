use axum::{
    Router,
    routing::{delete, patch, post},
};

use super::controller::{
    accept_interview, delete_interview, get_interviews, hire_candidate, reject_interview,
    schedule_interview,
};
use crate::state::AppState;

// The hire route's first segment is the candidate id; it shares the `{id}`
// name with the interview routes because sibling captures must match.
pub fn init_interviews_router() -> Router<AppState> {
    Router::new()
        .route("/", post(schedule_interview).get(get_interviews))
        .route("/{id}", delete(delete_interview).patch(accept_interview))
        .route("/{id}/reject", delete(reject_interview))
        .route("/{id}/hire/{jobid}", patch(hire_candidate))
}
