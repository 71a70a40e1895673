use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{authorize, login_user, register_user, verify, verify_head};
use crate::modules::health::health;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/verify", get(verify).head(verify_head))
        .route("/authorize", get(authorize))
        .route("/health", get(health))
}
