use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    create_exam, delete_exam, enter_grade, get_exam, get_exam_registrations, get_exams,
    get_my_registrations, register_for_exam, update_exam,
};
use crate::state::AppState;

pub fn init_exams_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_exam).get(get_exams))
        .route("/my-registrations", get(get_my_registrations))
        .route("/{id}", get(get_exam).put(update_exam).delete(delete_exam))
        .route("/{id}/register", post(register_for_exam))
        .route("/{id}/grade", put(enter_grade))
        .route("/{id}/examregistrations", get(get_exam_registrations))
}
