#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use eadmin::state::AppState;
use eadmin_auth::{LocalTokenVerifier, Role, TokenVerifier, issue_token};
use eadmin_config::{CorsConfig, JwtConfig, ServicesConfig};
use eadmin_core::hash_password;

pub const TEST_PASSWORD: &str = "testpass123";

/// Nothing listens on the discard port, so calls fail fast.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-with-enough-length".to_string(),
        token_ttl: 3_600,
    }
}

/// Sibling services all point at [`UNREACHABLE_URL`].
pub fn unreachable_services() -> ServicesConfig {
    ServicesConfig {
        auth_url: UNREACHABLE_URL.to_string(),
        university_url: UNREACHABLE_URL.to_string(),
        employment_url: UNREACHABLE_URL.to_string(),
        verify_timeout: Duration::from_secs(1),
        upstream_timeout: Duration::from_secs(1),
        employed_lookup_timeout: Duration::from_millis(500),
    }
}

/// State that verifies tokens in-process with [`test_jwt_config`].
pub fn test_state(pool: PgPool, services: ServicesConfig) -> AppState {
    let verifier: Arc<dyn TokenVerifier> = Arc::new(LocalTokenVerifier::new(test_jwt_config()));
    state_with_verifier(pool, services, verifier)
}

pub fn state_with_verifier(
    pool: PgPool,
    services: ServicesConfig,
    verifier: Arc<dyn TokenVerifier>,
) -> AppState {
    let cors_config = CorsConfig {
        allowed_origins: vec!["http://localhost:3000".to_string()],
    };
    AppState::new(pool, test_jwt_config(), cors_config, services, verifier).unwrap()
}

pub fn token_for(email: &str, role: Role) -> String {
    issue_token("Test User", email, role, &test_jwt_config()).unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn generate_unique_indexno() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("RA-{}/2021", &id[..8])
}

pub async fn create_user(pool: &PgPool, email: &str, role: Role, indexno: Option<&str>) -> Uuid {
    let hashed = hash_password(TEST_PASSWORD).unwrap();
    let status = (role == Role::Student).then_some("ACTIVE");

    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO users (fullname, email, password, role, indexno, status)
           VALUES ($1, $2, $3, $4, $5, $6)
           RETURNING id"#,
    )
    .bind("Test User")
    .bind(email)
    .bind(hashed)
    .bind(role.as_str())
    .bind(indexno)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_program(pool: &PgPool, ects: i32) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO programs (name, ects) VALUES ($1, $2) RETURNING id")
        .bind(format!("Program {}", Uuid::new_v4()))
        .bind(ects)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_course(pool: &PgPool, program_id: Uuid, ects: i32) -> Uuid {
    let code = Uuid::new_v4().simple().to_string();
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO courses (code, name, ects, programid)
           VALUES ($1, $2, $3, $4)
           RETURNING id"#,
    )
    .bind(format!("C-{}", &code[..8]))
    .bind("Test Course")
    .bind(ects)
    .bind(program_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_exam(pool: &PgPool, course_id: Uuid, professor_id: Uuid) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO exams (examtime, courseid, professorid)
           VALUES (NOW() + INTERVAL '7 days', $1, $2)
           RETURNING id"#,
    )
    .bind(course_id)
    .bind(professor_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn register_course(pool: &PgPool, course_id: Uuid, student_id: Uuid) {
    sqlx::query("INSERT INTO course_registrations (courseid, studentid) VALUES ($1, $2)")
        .bind(course_id)
        .bind(student_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn register_exam(pool: &PgPool, exam_id: Uuid, student_id: Uuid) {
    sqlx::query("INSERT INTO exam_registrations (examid, studentid) VALUES ($1, $2)")
        .bind(exam_id)
        .bind(student_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_job(pool: &PgPool, employer_id: Uuid, requiredfaculty: bool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO jobs (employerid, title, requiredfaculty)
           VALUES ($1, $2, $3)
           RETURNING id"#,
    )
    .bind(employer_id)
    .bind("Backend Developer")
    .bind(requiredfaculty)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_application(pool: &PgPool, job_id: Uuid, candidate_id: Uuid) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO job_applications (jobid, candidateid) VALUES ($1, $2) RETURNING id",
    )
    .bind(job_id)
    .bind(candidate_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn build_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends one request and returns the status and the JSON body, or `Null`
/// for an empty body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(build_request(method, uri, token, body))
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
