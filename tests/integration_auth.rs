mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

use common::{
    create_user, generate_unique_email, send, test_jwt_config, test_state, token_for,
    unreachable_services, TEST_PASSWORD,
};
use eadmin::router::init_auth_service_router;
use eadmin_auth::{Role, TokenClaims, encode_claims};

fn setup_test_app(pool: PgPool) -> axum::Router {
    init_auth_service_router(test_state(pool, unreachable_services()))
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_then_login(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "fullName": "Ana Anić",
            "email": email,
            "password": "secret-pass",
            "role": "student"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["role"], "student");
    assert_eq!(body["user"]["fullName"], "Ana Anić");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "invalid email or password" }));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email_is_unauthorized(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": generate_unique_email(), "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let email = generate_unique_email();
    create_user(&pool, &email, Role::Candidate, None).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "fullName": "Someone Else",
            "email": email.to_uppercase(),
            "password": "secret-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_defaults_to_candidate(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "fullName": "Pera Perić",
            "email": generate_unique_email(),
            "password": "secret-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "candidate");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_rejects_missing_fields_and_admin_roles(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": generate_unique_email(), "password": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "fullName, email and password are required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "fullName": "Mallory",
            "email": generate_unique_email(),
            "password": "secret-pass",
            "role": "facultyadmin"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "role cannot be self-assigned");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_get_and_head(pool: PgPool) {
    let app = setup_test_app(pool);
    let token = token_for("prof@uni.rs", Role::Professor);

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/verify", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "ok": true, "email": "prof@uni.rs", "role": "professor" })
    );

    let (status, body) = send(&app, Method::HEAD, "/api/v1/auth/verify", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_authorize_allows_and_denies(pool: PgPool) {
    let app = setup_test_app(pool);
    let token = token_for("student@uni.rs", Role::Student);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/auth/authorize?role=student&role=professor",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allowed"], true);
    assert_eq!(body["email"], "student@uni.rs");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/auth/authorize?any=professor,facultyadmin",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["allowed"], false);
    assert_eq!(body["role"], "student");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_and_expired_tokens_are_rejected(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/verify", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "missing bearer token" }));

    let now = Utc::now().timestamp() as usize;
    let expired = encode_claims(
        &TokenClaims {
            name: "Old".to_string(),
            email: "old@uni.rs".to_string(),
            role: "student".to_string(),
            iat: now - 7_200,
            exp: now - 3_600,
        },
        &test_jwt_config(),
    )
    .unwrap();

    let (status, body) =
        send(&app, Method::GET, "/api/v1/auth/verify", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "invalid token" }));

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/auth/verify",
        Some("not-a-jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_seeded_password(pool: PgPool) {
    let email = generate_unique_email();
    create_user(&pool, &email, Role::Employee, None).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "employee");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_endpoints(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = send(&app, Method::GET, "/api/v1/auth/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
