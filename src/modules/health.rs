use axum::Json;

use eadmin_models::common::HealthResponse;

/// Liveness probe; never touches the store.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
