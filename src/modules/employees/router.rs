use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    create_employee, delete_employee, get_employee, get_employee_by_email, get_employees,
    get_university_professors, is_employed, quit_job, update_employee,
};
use crate::state::AppState;

pub fn init_employees_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_employee).get(get_employees))
        .route("/by-email", get(get_employee_by_email))
        .route("/quit/job", put(quit_job))
        .route("/professors/all", get(get_university_professors))
        .route("/employed/{indexno}", get(is_employed))
        .route(
            "/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}
