mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use common::{
    create_application, create_job, create_user, generate_unique_email, generate_unique_indexno,
    send, spawn_server, test_state, token_for, unreachable_services,
};
use eadmin::router::{init_employment_router, init_university_router};
use eadmin_auth::Role;

fn setup_test_app(pool: PgPool) -> axum::Router {
    init_employment_router(test_state(pool, unreachable_services()))
}

/// An employment office whose university relay hits a live university
/// service sharing the same database.
async fn setup_with_university(pool: PgPool) -> axum::Router {
    let university = spawn_server(init_university_router(test_state(
        pool.clone(),
        unreachable_services(),
    )))
    .await;

    let mut services = unreachable_services();
    services.university_url = university;
    init_employment_router(test_state(pool, services))
}

async fn role_and_job(pool: &PgPool, id: Uuid) -> (String, Option<Uuid>) {
    sqlx::query_as::<_, (String, Option<Uuid>)>("SELECT role, jobid FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn employer(pool: &PgPool) -> (Uuid, String) {
    let email = generate_unique_email();
    let id = create_user(pool, &email, Role::Employee, None).await;
    (id, token_for(&email, Role::Employee))
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_job_as_employee(pool: PgPool) {
    let (employer_id, token) = employer(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/employmentOffice/jobs",
        Some(&token),
        Some(json!({ "title": "Rust Developer", "location": "Novi Sad" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["employerid"], employer_id.to_string());
    assert_eq!(body["requiredfaculty"], false);

    let candidate = token_for("c@office.rs", Role::Candidate);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/employmentOffice/jobs",
        Some(&candidate),
        Some(json!({ "title": "Nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_apply_requires_graduation(pool: PgPool) {
    let indexno = generate_unique_indexno();
    let student_id =
        create_user(&pool, &generate_unique_email(), Role::Student, Some(&indexno)).await;
    let candidate_email = generate_unique_email();
    create_user(&pool, &candidate_email, Role::Candidate, Some(&indexno)).await;
    let (employer_id, _) = employer(&pool).await;
    let faculty_job = create_job(&pool, employer_id, true).await;
    let open_job = create_job(&pool, employer_id, false).await;

    let app = setup_with_university(pool.clone()).await;
    let token = token_for(&candidate_email, Role::Candidate);
    let apply = |job: Uuid| format!("/api/v1/employmentOffice/jobs/{}/{}/apply", job, candidate_email);

    let (status, body) = send(&app, Method::POST, &apply(faculty_job), Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "graduation is required for this job");

    let (status, body) = send(&app, Method::POST, &apply(open_job), Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["jobid"], open_job.to_string());

    let (status, body) = send(&app, Method::POST, &apply(open_job), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already applied for this job");

    sqlx::query("UPDATE users SET status = 'GRADUATED' WHERE id = $1")
        .bind(student_id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = send(&app, Method::POST, &apply(faculty_job), Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_apply_on_behalf_of_another_candidate_is_forbidden(pool: PgPool) {
    let victim_email = generate_unique_email();
    create_user(&pool, &victim_email, Role::Candidate, None).await;
    let (employer_id, _) = employer(&pool).await;
    let job_id = create_job(&pool, employer_id, false).await;
    let app = setup_test_app(pool.clone());
    let token = token_for(&generate_unique_email(), Role::Candidate);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/employmentOffice/jobs/{}/{}/apply", job_id, victim_email),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "candidates can only apply for themselves");

    let applications = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM job_applications WHERE jobid = $1",
    )
    .bind(job_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(applications, 0);

    // The path email is matched case-insensitively.
    let own_token = token_for(&victim_email, Role::Candidate);
    let (status, _) = send(
        &app,
        Method::POST,
        &format!(
            "/api/v1/employmentOffice/jobs/{}/{}/apply",
            job_id,
            victim_email.to_uppercase()
        ),
        Some(&own_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_apply_without_index_number_is_forbidden(pool: PgPool) {
    let candidate_email = generate_unique_email();
    create_user(&pool, &candidate_email, Role::Candidate, None).await;
    let (employer_id, _) = employer(&pool).await;
    let faculty_job = create_job(&pool, employer_id, true).await;
    let app = setup_test_app(pool);
    let token = token_for(&candidate_email, Role::Candidate);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/employmentOffice/jobs/{}/{}/apply", faculty_job, candidate_email),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_apply_fails_when_university_unreachable(pool: PgPool) {
    let candidate_email = generate_unique_email();
    create_user(&pool, &candidate_email, Role::Candidate, Some("RA-1/2020")).await;
    let (employer_id, _) = employer(&pool).await;
    let faculty_job = create_job(&pool, employer_id, true).await;
    let app = setup_test_app(pool.clone());
    let token = token_for(&candidate_email, Role::Candidate);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/employmentOffice/jobs/{}/{}/apply", faculty_job, candidate_email),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("university service is unavailable")
    );

    let applications = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_applications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(applications, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_job_candidates_ranked_by_university(pool: PgPool) {
    let (employer_id, employer_token) = employer(&pool).await;
    let job_id = create_job(&pool, employer_id, false).await;

    let app = setup_with_university(pool.clone()).await;
    let uri = format!("/api/v1/employmentOffice/jobs/{}/candidates", job_id);

    let (status, body) = send(&app, Method::GET, &uri, Some(&employer_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let indexno = generate_unique_indexno();
    create_user(&pool, &generate_unique_email(), Role::Student, Some(&indexno)).await;
    let candidate_id =
        create_user(&pool, &generate_unique_email(), Role::Candidate, Some(&indexno)).await;
    create_application(&pool, job_id, candidate_id).await;

    let (status, body) = send(&app, Method::GET, &uri, Some(&employer_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["indexno"], indexno.as_str());
    assert!(body[0]["avggrade"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_interview_conflict_hire_and_quit(pool: PgPool) {
    let candidate_email = generate_unique_email();
    let candidate_id = create_user(&pool, &candidate_email, Role::Candidate, None).await;
    let (employer_id, employer_token) = employer(&pool).await;
    let job_id = create_job(&pool, employer_id, false).await;
    let application_id = create_application(&pool, job_id, candidate_id).await;

    let app = setup_test_app(pool.clone());
    let candidate_token = token_for(&candidate_email, Role::Candidate);
    let schedule = json!({
        "jobapplicationid": application_id,
        "candidateid": candidate_id,
        "jobid": job_id,
        "datetime": "2030-05-01T10:00:00Z",
        "type": "online",
        "location": "Zoom"
    });

    let (status, interview) = send(
        &app,
        Method::POST,
        "/api/v1/employmentOffice/interviews",
        Some(&candidate_token),
        Some(schedule.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(interview["status"], "SCHEDULED");
    assert_eq!(interview["type"], "online");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/employmentOffice/interviews",
        Some(&candidate_token),
        Some(schedule),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "interview already scheduled");

    let interview_id = interview["id"].as_str().unwrap();
    let (status, accepted) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/employmentOffice/interviews/{}", interview_id),
        Some(&employer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "ACCEPTED");

    let (status, hired) = send(
        &app,
        Method::PATCH,
        &format!(
            "/api/v1/employmentOffice/interviews/{}/hire/{}",
            candidate_id, job_id
        ),
        Some(&employer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hired["role"], "employee");
    assert_eq!(role_and_job(&pool, candidate_id).await, ("employee".to_string(), Some(job_id)));

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/employmentOffice/interviews/{}", interview_id),
        Some(&employer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "interview is already resolved");

    let employee_token = token_for(&candidate_email, Role::Employee);
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/employmentOffice/employees/quit/job",
        Some(&employee_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["jobid"].is_null());
    assert_eq!(role_and_job(&pool, candidate_id).await, ("candidate".to_string(), None));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_hire_without_open_interview_is_not_found(pool: PgPool) {
    let candidate_id = create_user(&pool, &generate_unique_email(), Role::Candidate, None).await;
    let (employer_id, employer_token) = employer(&pool).await;
    let job_id = create_job(&pool, employer_id, false).await;
    let app = setup_test_app(pool.clone());

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!(
            "/api/v1/employmentOffice/interviews/{}/hire/{}",
            candidate_id, job_id
        ),
        Some(&employer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(role_and_job(&pool, candidate_id).await.0, "candidate");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reject_interview_withdraws_application(pool: PgPool) {
    let candidate_id = create_user(&pool, &generate_unique_email(), Role::Candidate, None).await;
    let (employer_id, employer_token) = employer(&pool).await;
    let job_id = create_job(&pool, employer_id, false).await;
    let application_id = create_application(&pool, job_id, candidate_id).await;
    let interview_id = insert_interview(&pool, application_id, candidate_id, job_id).await;

    let app = setup_test_app(pool.clone());
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/employmentOffice/interviews/{}/reject", interview_id),
        Some(&employer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let status_text =
        sqlx::query_scalar::<_, String>("SELECT status FROM interviews WHERE id = $1")
            .bind(interview_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status_text, "REJECTED");

    let applications = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM job_applications WHERE id = $1",
    )
    .bind(application_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(applications, 0);
}

async fn insert_interview(
    pool: &PgPool,
    application_id: Uuid,
    candidate_id: Uuid,
    job_id: Uuid,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO interviews (jobapplicationid, candidateid, jobid, datetime, type)
           VALUES ($1, $2, $3, NOW(), 'onsite')
           RETURNING id"#,
    )
    .bind(application_id)
    .bind(candidate_id)
    .bind(job_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rejecting_a_resolved_interview_keeps_new_application(pool: PgPool) {
    let candidate_id = create_user(&pool, &generate_unique_email(), Role::Candidate, None).await;
    let (employer_id, employer_token) = employer(&pool).await;
    let job_id = create_job(&pool, employer_id, false).await;
    let first_application = create_application(&pool, job_id, candidate_id).await;
    let first_interview = insert_interview(&pool, first_application, candidate_id, job_id).await;

    let app = setup_test_app(pool.clone());
    let reject_uri = format!("/api/v1/employmentOffice/interviews/{}/reject", first_interview);
    let (status, _) = send(&app, Method::DELETE, &reject_uri, Some(&employer_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The candidate applies again and gets a fresh interview.
    let second_application = create_application(&pool, job_id, candidate_id).await;
    let second_interview = insert_interview(&pool, second_application, candidate_id, job_id).await;

    let (status, body) = send(&app, Method::DELETE, &reject_uri, Some(&employer_token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "interview is already resolved");

    let applications = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM job_applications WHERE id = $1",
    )
    .bind(second_application)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(applications, 1);

    let (status_text, application_ref) = sqlx::query_as::<_, (String, Option<Uuid>)>(
        "SELECT status, jobapplicationid FROM interviews WHERE id = $1",
    )
    .bind(second_interview)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status_text, "SCHEDULED");
    assert_eq!(application_ref, Some(second_application));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_employed_lookup(pool: PgPool) {
    let indexno = generate_unique_indexno();
    create_user(&pool, &generate_unique_email(), Role::Employee, Some(&indexno)).await;
    let app = setup_test_app(pool);
    let token = token_for("prof@uni.rs", Role::Professor);

    let encoded = indexno.replace('/', "%2F");
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/employmentOffice/employees/employed/{}", encoded),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "indexno": indexno, "employed": true }));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/employmentOffice/employees/employed/RA-0%2F1900",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employed"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_professors_relay_unreachable_is_service_unavailable(pool: PgPool) {
    let app = setup_test_app(pool);
    let token = token_for("e@office.rs", Role::Employee);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/employmentOffice/employees/professors/all",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_employee_writes_require_ssz_admin(pool: PgPool) {
    let app = setup_test_app(pool);
    let body = json!({
        "fullname": "Jova Jović",
        "email": generate_unique_email(),
        "password": "long-enough"
    });

    let employee = token_for("e@office.rs", Role::Employee);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/employmentOffice/employees",
        Some(&employee),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token_for("admin@office.rs", Role::SszAdmin);
    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/employmentOffice/employees",
        Some(&admin),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["jobid"].is_null());
}
