//! End-to-end tests for the form-action pipeline.
//!
//! Each test drives the assembled app over HTTP: URL-encoded submissions
//! in, envelope JSON out, with the cookie session carrying the caller's
//! identity. Expected failures must come back in band with status 200;
//! only malformed requests outside the envelope contract get error codes.

mod support;

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::DateTime;
use daylist_backend::domain::account::TIME_ZONE_INVALID;
use daylist_backend::domain::ports::{FixtureIdentityGateway, RefreshScope};
use daylist_backend::domain::task::{NAME_REQUIRED, PROJECT_INVALID};
use daylist_backend::domain::{
    GENERIC_INTERNAL_MESSAGE, Project, ProjectId, SESSION_EXPIRED_MESSAGE, Task, TaskId, UserId,
};
use serde_json::{Value, json};
use uuid::Uuid;

const OTHER_USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn fixture_user() -> UserId {
    UserId::new(FixtureIdentityGateway::USER_ID).expect("fixture user id")
}

/// Sign the fixture identity in and hand back the app plus its cookie.
async fn signed_in_app(
    backend: &support::TestBackend,
) -> (
    impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    Cookie<'static>,
) {
    let app = test::init_service(support::app(backend)).await;
    let response = test::call_service(&app, support::sign_in_request().to_request()).await;
    let cookie = support::session_cookie(&response);
    (app, cookie)
}

fn post_form(uri: &str, cookie: &Cookie<'static>, fields: &[(&str, &str)]) -> Request {
    test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_form(fields)
        .to_request()
}

fn get(uri: &str, cookie: &Cookie<'static>) -> Request {
    test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request()
}

#[actix_web::test]
async fn a_signed_in_user_creates_and_lists_work() {
    let backend = support::backend();
    let (app, cookie) = signed_in_app(&backend).await;

    let request = post_form(
        "/api/v1/projects/create",
        &cookie,
        &[("name", "Errands"), ("description", "Weekend running around")],
    );
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["name"].as_str(), Some("Errands"));
    assert_eq!(body["data"]["isArchived"].as_bool(), Some(false));
    let project_id = body["data"]["id"].as_str().expect("project id").to_owned();

    let request = post_form(
        "/api/v1/tasks/create",
        &cookie,
        &[
            ("name", "Buy milk"),
            ("projectId", project_id.as_str()),
            ("dueDate", "2026-03-01"),
        ],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["name"].as_str(), Some("Buy milk"));
    assert_eq!(
        body["data"]["projectId"].as_str(),
        Some(project_id.as_str())
    );
    assert_eq!(body["data"]["isCompleted"].as_bool(), Some(false));
    let due = DateTime::parse_from_rfc3339(body["data"]["dueDate"].as_str().expect("due date"))
        .expect("well-formed due date");
    assert_eq!(
        due,
        DateTime::parse_from_rfc3339("2026-03-01T00:00:00Z").expect("expected instant")
    );

    let response = test::call_service(&app, get("/api/v1/tasks", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    let tasks = body["data"].as_array().expect("task listing");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"].as_str(), Some("Buy milk"));

    let response = test::call_service(&app, get("/api/v1/projects", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    let projects = body["data"].as_array().expect("project listing");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"].as_str(), Some("Errands"));

    let request = post_form(
        "/api/v1/projects/delete",
        &cookie,
        &[("id", project_id.as_str())],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["id"].as_str(), Some(project_id.as_str()));

    let response = test::call_service(&app, get("/api/v1/projects", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn envelope_responses_carry_a_trace_id() {
    let backend = support::backend();
    let app = test::init_service(support::app(&backend)).await;

    let request = test::TestRequest::get().uri("/api/v1/tasks").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get("trace-id")
        .expect("trace header")
        .to_str()
        .expect("ascii trace id");
    Uuid::parse_str(header).expect("trace id is a uuid");
}

#[actix_web::test]
async fn validation_failures_come_back_in_band() {
    let backend = support::backend();
    let (app, cookie) = signed_in_app(&backend).await;

    let request = post_form(
        "/api/v1/tasks/create",
        &cookie,
        &[("name", ""), ("projectId", "not-a-uuid")],
    );
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({
            "errors": [
                {"path": "name", "message": NAME_REQUIRED},
                {"path": "projectId", "message": PROJECT_INVALID},
            ]
        })
    );
}

#[actix_web::test]
async fn validation_runs_before_the_session_gate() {
    let backend = support::backend();
    let app = test::init_service(support::app(&backend)).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/tasks/create")
        .set_form([("name", ""), ("projectId", "not-a-uuid")])
        .to_request();
    let response = test::call_service(&app, request).await;

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["errors"][0]["path"].as_str(), Some("name"));
    assert_eq!(body["errors"][0]["message"].as_str(), Some(NAME_REQUIRED));
}

#[actix_web::test]
async fn requests_without_a_session_report_the_expired_message() {
    let backend = support::backend();
    let app = test::init_service(support::app(&backend)).await;
    let expired = json!({
        "errors": [{"path": "", "message": SESSION_EXPIRED_MESSAGE}]
    });

    let request = test::TestRequest::post()
        .uri("/api/v1/tasks/create")
        .set_form([
            ("name", "Buy milk"),
            ("projectId", "6f9619ff-8b86-4d01-b42d-00cf4fc964ff"),
        ])
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, expired);

    let request = test::TestRequest::get().uri("/api/v1/tasks").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, expired);
}

#[actix_web::test]
async fn updates_touch_only_the_submitted_fields() {
    let backend = support::backend();
    let (app, cookie) = signed_in_app(&backend).await;

    let request = post_form("/api/v1/projects/create", &cookie, &[("name", "Errands")]);
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_owned();

    let request = post_form(
        "/api/v1/tasks/create",
        &cookie,
        &[
            ("name", "Buy milk"),
            ("description", "Semi-skimmed"),
            ("projectId", project_id.as_str()),
            ("dueDate", "2026-03-01"),
        ],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    let task_id = body["data"]["id"].as_str().expect("task id").to_owned();

    // The completion checkbox submits alone; everything else must survive.
    let request = post_form(
        "/api/v1/tasks/update",
        &cookie,
        &[("id", task_id.as_str()), ("isCompleted", "true")],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["isCompleted"].as_bool(), Some(true));
    assert_eq!(body["data"]["name"].as_str(), Some("Buy milk"));
    assert_eq!(body["data"]["description"].as_str(), Some("Semi-skimmed"));
    let due = DateTime::parse_from_rfc3339(body["data"]["dueDate"].as_str().expect("due date"))
        .expect("well-formed due date");
    assert_eq!(
        due,
        DateTime::parse_from_rfc3339("2026-03-01T00:00:00Z").expect("expected instant")
    );

    let response = test::call_service(&app, get("/api/v1/tasks?status=completed", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let response = test::call_service(&app, get("/api/v1/tasks?status=pending", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[actix_web::test]
async fn blank_optional_fields_clear_the_stored_values() {
    let backend = support::backend();
    let (app, cookie) = signed_in_app(&backend).await;

    let request = post_form("/api/v1/projects/create", &cookie, &[("name", "Errands")]);
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_owned();

    let request = post_form(
        "/api/v1/tasks/create",
        &cookie,
        &[
            ("name", "Buy milk"),
            ("description", "Semi-skimmed"),
            ("projectId", project_id.as_str()),
            ("dueDate", "2026-03-01"),
        ],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    let task_id = body["data"]["id"].as_str().expect("task id").to_owned();

    let request = post_form(
        "/api/v1/tasks/update",
        &cookie,
        &[
            ("id", task_id.as_str()),
            ("description", ""),
            ("dueDate", ""),
        ],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert!(body["data"]["description"].is_null());
    assert!(body["data"]["dueDate"].is_null());
    assert_eq!(body["data"]["name"].as_str(), Some("Buy milk"));
}

#[actix_web::test]
async fn deleting_twice_masks_the_missing_row() {
    let backend = support::backend();
    let (app, cookie) = signed_in_app(&backend).await;

    let request = post_form("/api/v1/projects/create", &cookie, &[("name", "Errands")]);
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_owned();

    let request = post_form(
        "/api/v1/tasks/create",
        &cookie,
        &[("name", "Buy milk"), ("projectId", project_id.as_str())],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    let task_id = body["data"]["id"].as_str().expect("task id").to_owned();

    let request = post_form("/api/v1/tasks/delete", &cookie, &[("id", task_id.as_str())]);
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["id"].as_str(), Some(task_id.as_str()));

    let response = test::call_service(&app, get("/api/v1/tasks", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    // The row is gone, so the retry reads as an internal failure rather
    // than leaking whether the id ever existed.
    let request = post_form("/api/v1/tasks/delete", &cookie, &[("id", task_id.as_str())]);
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({
            "errors": [{"path": "", "message": GENERIC_INTERNAL_MESSAGE}]
        })
    );
}

#[actix_web::test]
async fn another_users_rows_stay_invisible() {
    let backend = support::backend();
    let owner = UserId::new(OTHER_USER).expect("owner id");
    let project = Project::builder(ProjectId::random(), owner.clone())
        .name("Their plans")
        .build();
    let task = Task::builder(TaskId::random(), owner, project.id.clone())
        .name("Their errand")
        .build();
    backend.projects.seed_project(project.clone());
    backend.tasks.seed_project(project.clone());
    backend.tasks.seed_task(task.clone());
    let task_id = task.id.to_string();
    let project_id = project.id.to_string();
    let (app, cookie) = signed_in_app(&backend).await;

    let response = test::call_service(&app, get("/api/v1/tasks", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let response = test::call_service(&app, get("/api/v1/projects", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let uri = format!("/api/v1/tasks/{task_id}");
    let response = test::call_service(&app, get(&uri, &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!({"data": null}));

    let request = post_form(
        "/api/v1/tasks/update",
        &cookie,
        &[("id", task_id.as_str()), ("name", "Mine now")],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body["errors"][0]["message"].as_str(),
        Some(GENERIC_INTERNAL_MESSAGE)
    );

    let request = post_form(
        "/api/v1/projects/delete",
        &cookie,
        &[("id", project_id.as_str())],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body["errors"][0]["message"].as_str(),
        Some(GENERIC_INTERNAL_MESSAGE)
    );

    assert_eq!(backend.tasks.task_count(), 1);
    assert_eq!(backend.projects.project_count(), 1);
}

#[actix_web::test]
async fn malformed_ids_in_the_path_are_rejected() {
    let backend = support::backend();
    let app = test::init_service(support::app(&backend)).await;

    let request = test::TestRequest::get()
        .uri("/api/v1/tasks/not-a-uuid")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"].as_str(), Some("invalid_request"));
    assert_eq!(body["details"]["field"].as_str(), Some("id"));

    let request = test::TestRequest::get()
        .uri("/api/v1/projects/also-not-a-uuid")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"].as_str(), Some("invalid_request"));
}

#[actix_web::test]
async fn an_unknown_task_id_reads_as_null_data() {
    let backend = support::backend();
    let (app, cookie) = signed_in_app(&backend).await;

    let uri = format!("/api/v1/tasks/{}", TaskId::random());
    let response = test::call_service(&app, get(&uri, &cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!({"data": null}));
}

#[actix_web::test]
async fn the_task_detail_joins_its_owning_project() {
    let backend = support::backend();
    let owner = fixture_user();
    let project = Project::builder(ProjectId::random(), owner.clone())
        .name("Errands")
        .build();
    let task = Task::builder(TaskId::random(), owner, project.id.clone())
        .name("Buy milk")
        .build();
    backend.tasks.seed_project(project.clone());
    backend.tasks.seed_task(task.clone());
    let (app, cookie) = signed_in_app(&backend).await;

    let uri = format!("/api/v1/tasks/{}", task.id);
    let response = test::call_service(&app, get(&uri, &cookie)).await;

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["task"]["name"].as_str(), Some("Buy milk"));
    assert_eq!(body["data"]["project"]["name"].as_str(), Some("Errands"));
    assert_eq!(
        body["data"]["project"]["id"].as_str(),
        Some(project.id.to_string().as_str())
    );
}

#[actix_web::test]
async fn due_filters_narrow_the_listing() {
    let backend = support::backend();
    let (app, cookie) = signed_in_app(&backend).await;

    let request = post_form("/api/v1/projects/create", &cookie, &[("name", "Errands")]);
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_owned();

    for (name, due) in [
        ("Buy milk", Some("2026-03-01")),
        ("File taxes", Some("2026-03-10")),
        ("Someday", None),
    ] {
        let mut fields = vec![("name", name), ("projectId", project_id.as_str())];
        if let Some(due) = due {
            fields.push(("dueDate", due));
        }
        let request = post_form("/api/v1/tasks/create", &cookie, &fields);
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = test::call_service(&app, get("/api/v1/tasks?due_by=2026-03-05", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    let tasks = body["data"].as_array().expect("task listing");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"].as_str(), Some("Buy milk"));

    let response = test::call_service(&app, get("/api/v1/tasks?due_on=2026-03-10", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    let tasks = body["data"].as_array().expect("task listing");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"].as_str(), Some("File taxes"));

    let response = test::call_service(
        &app,
        get("/api/v1/tasks?due_by=2026-03-05&due_on=2026-03-10", &cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body["message"].as_str(),
        Some("filter by due_by or due_on, not both")
    );

    let response = test::call_service(&app, get("/api/v1/tasks?due_by=March", &cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body["message"].as_str(),
        Some("due date filters must be YYYY-MM-DD dates")
    );
}

#[actix_web::test]
async fn the_archive_filter_screens_tasks_by_project_state() {
    let backend = support::backend();
    let owner = fixture_user();
    let active = Project::builder(ProjectId::random(), owner.clone())
        .name("Errands")
        .build();
    let archived = Project::builder(ProjectId::random(), owner.clone())
        .name("Old plans")
        .archived(true)
        .build();
    backend.tasks.seed_project(active.clone());
    backend.tasks.seed_project(archived.clone());
    backend.tasks.seed_task(
        Task::builder(TaskId::random(), owner.clone(), active.id.clone())
            .name("Buy milk")
            .build(),
    );
    backend.tasks.seed_task(
        Task::builder(TaskId::random(), owner, archived.id.clone())
            .name("File taxes")
            .build(),
    );
    let (app, cookie) = signed_in_app(&backend).await;

    let response =
        test::call_service(&app, get("/api/v1/tasks?project_status=active", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    let tasks = body["data"].as_array().expect("task listing");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"].as_str(), Some("Buy milk"));

    let response =
        test::call_service(&app, get("/api/v1/tasks?project_status=archived", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    let tasks = body["data"].as_array().expect("task listing");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"].as_str(), Some("File taxes"));
}

#[actix_web::test]
async fn the_time_zone_preference_updates_through_the_form() {
    let backend = support::backend();
    let (app, cookie) = signed_in_app(&backend).await;

    let request = post_form(
        "/api/v1/account/time-zone",
        &cookie,
        &[("timeZone", "Europe/London")],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["timeZone"].as_str(), Some("Europe/London"));

    let response = test::call_service(&app, get("/api/v1/account", &cookie)).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["timeZone"].as_str(), Some("Europe/London"));

    let request = post_form(
        "/api/v1/account/time-zone",
        &cookie,
        &[("timeZone", "Mars/Olympus")],
    );
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({
            "errors": [{"path": "timeZone", "message": TIME_ZONE_INVALID}]
        })
    );
}

#[actix_web::test]
async fn mutations_broadcast_refresh_hints() {
    let backend = support::backend();
    let mut feed = backend.hub.subscribe();
    let (app, cookie) = signed_in_app(&backend).await;

    let request = post_form("/api/v1/projects/create", &cookie, &[("name", "Errands")]);
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    let project_id = body["data"]["id"].as_str().expect("project id").to_owned();

    let hint = feed.recv().await.expect("project hint");
    assert_eq!(hint.scope, RefreshScope::Projects);
    assert_eq!(hint.user, fixture_user());

    let request = post_form(
        "/api/v1/tasks/create",
        &cookie,
        &[("name", "Buy milk"), ("projectId", project_id.as_str())],
    );
    test::call_service(&app, request).await;

    let hint = feed.recv().await.expect("task hint");
    assert_eq!(hint.scope, RefreshScope::Tasks);

    // Deleting a project invalidates task views too, so it hints twice.
    let request = post_form(
        "/api/v1/projects/delete",
        &cookie,
        &[("id", project_id.as_str())],
    );
    test::call_service(&app, request).await;

    let hint = feed.recv().await.expect("first delete hint");
    assert_eq!(hint.scope, RefreshScope::Projects);
    let hint = feed.recv().await.expect("second delete hint");
    assert_eq!(hint.scope, RefreshScope::Tasks);
}
