use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_course, delete_course, get_course, get_courses, get_my_registrations,
    register_for_course, update_course,
};
use crate::state::AppState;

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course).get(get_courses))
        .route("/my-registrations", get(get_my_registrations))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/register", post(register_for_course))
}
