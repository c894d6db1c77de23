//! Tests for project HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::Utc;
use serde_json::Value;

use super::*;
use crate::domain::ports::{
    MockAccountActions, MockIdentityResolver, MockProjectActions, MockTaskActions,
};
use crate::domain::project::NAME_REQUIRED;
use crate::domain::{FieldError, Principal, PrincipalContext, TimeZone, UserId};

const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
const PROJECT: &str = "6f9619ff-8b86-4d01-b42d-00cf4fc964ff";

fn principal() -> Principal {
    Principal::new(
        UserId::new(USER).expect("user id"),
        "ada@example.com",
        "Ada",
        TimeZone::utc(),
    )
}

fn project_fixture() -> Project {
    Project {
        id: ProjectId::new(PROJECT).expect("project id"),
        author_id: UserId::new(USER).expect("user id"),
        name: "Garden".to_owned(),
        description: None,
        is_archived: false,
        created_at: Utc::now(),
    }
}

fn test_app(
    projects: MockProjectActions,
    identity: MockIdentityResolver,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        Arc::new(MockTaskActions::new()),
        Arc::new(projects),
        Arc::new(MockAccountActions::new()),
        Arc::new(identity),
    );
    App::new()
        .app_data(web::Data::new(state))
        .wrap(crate::inbound::http::test_utils::test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(create_project)
                .service(update_project)
                .service(delete_project)
                .service(list_projects)
                .service(get_project),
        )
}

fn resolve_as_principal(identity: &mut MockIdentityResolver) {
    identity
        .expect_resolve()
        .returning(|_| PrincipalContext::authenticated(principal()));
}

#[actix_web::test]
async fn create_project_passes_the_decoded_form_to_the_action() {
    let mut projects = MockProjectActions::new();
    projects
        .expect_create_project()
        .withf(|_, input| input.get("name") == Some("Garden"))
        .returning(|_, _| ActionResult::success(project_fixture()));
    let mut identity = MockIdentityResolver::new();
    resolve_as_principal(&mut identity);
    let app = actix_test::init_service(test_app(projects, identity)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/projects/create")
        .set_form([("name", "Garden")])
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["data"]["name"].as_str(), Some("Garden"));
    assert_eq!(body["data"]["isArchived"].as_bool(), Some(false));
}

#[actix_web::test]
async fn create_project_reports_validation_failures_in_band() {
    let mut projects = MockProjectActions::new();
    projects
        .expect_create_project()
        .returning(|_, _| ActionResult::failure(vec![FieldError::new("name", NAME_REQUIRED)]));
    let mut identity = MockIdentityResolver::new();
    resolve_as_principal(&mut identity);
    let app = actix_test::init_service(test_app(projects, identity)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/projects/create")
        .set_form([("description", "no name")])
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["errors"][0]["path"].as_str(), Some("name"));
    assert_eq!(body["errors"][0]["message"].as_str(), Some(NAME_REQUIRED));
}

#[actix_web::test]
async fn update_project_passes_the_archival_flag_through() {
    let mut projects = MockProjectActions::new();
    projects
        .expect_update_project()
        .withf(|_, input| {
            input.get("id") == Some(PROJECT) && input.get("isArchived") == Some("true")
        })
        .returning(|_, _| {
            let mut archived = project_fixture();
            archived.is_archived = true;
            ActionResult::success(archived)
        });
    let mut identity = MockIdentityResolver::new();
    resolve_as_principal(&mut identity);
    let app = actix_test::init_service(test_app(projects, identity)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/projects/update")
        .set_form([("id", PROJECT), ("isArchived", "true")])
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["data"]["isArchived"].as_bool(), Some(true));
}

#[actix_web::test]
async fn list_projects_builds_the_filter_from_the_query() {
    let mut projects = MockProjectActions::new();
    projects
        .expect_list_projects()
        .withf(|_, filter| filter.status == Some(ProjectStatus::Archived))
        .returning(|_, _| ActionResult::success(Vec::new()));
    let mut identity = MockIdentityResolver::new();
    resolve_as_principal(&mut identity);
    let app = actix_test::init_service(test_app(projects, identity)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/projects?status=archived")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["data"], Value::Array(Vec::new()));
}

#[actix_web::test]
async fn list_projects_rejects_an_unknown_status() {
    let app = actix_test::init_service(test_app(
        MockProjectActions::new(),
        MockIdentityResolver::new(),
    ))
    .await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/projects?status=open")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"].as_str(), Some("invalid_request"));
    assert_eq!(body["details"]["field"].as_str(), Some("status"));
}

#[actix_web::test]
async fn get_project_returns_the_project_with_its_tasks() {
    let mut projects = MockProjectActions::new();
    projects
        .expect_find_project()
        .withf(|_, id| id.as_ref() == PROJECT)
        .returning(|_, _| {
            ActionResult::success(Some(ProjectWithTasks {
                project: project_fixture(),
                tasks: Vec::new(),
            }))
        });
    let mut identity = MockIdentityResolver::new();
    resolve_as_principal(&mut identity);
    let app = actix_test::init_service(test_app(projects, identity)).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/projects/{PROJECT}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["data"]["project"]["name"].as_str(), Some("Garden"));
    assert_eq!(body["data"]["tasks"], Value::Array(Vec::new()));
}

#[actix_web::test]
async fn get_project_rejects_a_malformed_id() {
    let app = actix_test::init_service(test_app(
        MockProjectActions::new(),
        MockIdentityResolver::new(),
    ))
    .await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/projects/garden")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"].as_str(), Some("invalid_request"));
}
