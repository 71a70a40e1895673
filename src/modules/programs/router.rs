use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_program, get_program, get_programs};
use crate::state::AppState;

pub fn init_programs_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_program).get(get_programs))
        .route("/{id}", get(get_program))
}
