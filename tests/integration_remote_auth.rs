mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use common::{
    UNREACHABLE_URL, create_user, generate_unique_email, send, spawn_server, state_with_verifier,
    test_state, token_for, unreachable_services,
};
use eadmin::router::{init_auth_service_router, init_university_router};
use eadmin_auth::{HttpTokenVerifier, Role, TokenVerifier};

/// A university service that verifies every token against `auth_url`.
fn university_verified_by(pool: PgPool, auth_url: &str) -> axum::Router {
    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(HttpTokenVerifier::new(auth_url, Duration::from_secs(1)).unwrap());
    init_university_router(state_with_verifier(pool, unreachable_services(), verifier))
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_verified_by_live_auth_service(pool: PgPool) {
    let auth_url = spawn_server(init_auth_service_router(test_state(
        pool.clone(),
        unreachable_services(),
    )))
    .await;
    let app = university_verified_by(pool, &auth_url);

    let token = token_for("prof@uni.rs", Role::Professor);
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/university/courses",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 0);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/university/courses",
        Some("forged.token.value"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "invalid token" }));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_comes_from_the_auth_service(pool: PgPool) {
    let auth_url = spawn_server(init_auth_service_router(test_state(
        pool.clone(),
        unreachable_services(),
    )))
    .await;
    let program_id = common::create_program(&pool, 240).await;
    let app = university_verified_by(pool, &auth_url);

    let token = token_for("student@uni.rs", Role::Student);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/university/courses",
        Some(&token),
        Some(json!({ "code": "X-1", "name": "X", "ects": 5, "programid": program_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unreachable_auth_service_fails_closed(pool: PgPool) {
    let email = generate_unique_email();
    create_user(&pool, &email, Role::Student, None).await;
    let app = university_verified_by(pool, UNREACHABLE_URL);
    let token = token_for(&email, Role::Student);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/university/courses",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");

    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
