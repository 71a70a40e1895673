use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_professor, delete_professor, get_professor, get_professor_by_email, get_professors,
    update_professor,
};
use crate::state::AppState;

pub fn init_professors_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_professor).get(get_professors))
        .route("/by-email", get(get_professor_by_email))
        .route(
            "/{id}",
            get(get_professor).put(update_professor).delete(delete_professor),
        )
}
