use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_student, delete_student, get_all_indices, get_avg_grades, get_student,
    get_student_by_email, get_students, update_student, verify_graduation,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(get_students))
        .route("/by-email", get(get_student_by_email))
        .route("/verify-graduation/{indexno}", get(verify_graduation))
        .route("/get/indexno/all", get(get_all_indices))
        .route("/avg-grades", post(get_avg_grades))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
