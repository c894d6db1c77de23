//! Project HTTP handlers.
//!
//! ```text
//! POST /api/v1/projects/create
//! POST /api/v1/projects/update
//! POST /api/v1/projects/delete
//! GET  /api/v1/projects
//! GET  /api/v1/projects/{id}
//! ```
//!
//! Same calling convention as the task handlers: form bodies in, the action
//! envelope out at status 200.

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::project::ProjectFilter;
use crate::domain::{ActionResult, Error, Project, ProjectId, ProjectStatus, ProjectWithTasks};
use crate::inbound::http::ApiResult;
use crate::inbound::http::forms::{self, FormBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Form fields accepted by the create endpoint.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreateProjectForm {
    /// Project name; required, at most 500 characters.
    name: String,
    /// Optional description, at most 500 characters.
    description: Option<String>,
    /// Optional archival flag, `true` or `false`.
    is_archived: Option<String>,
}

/// Form fields accepted by the update endpoint.
///
/// Absent fields keep their stored values; a blank `description` clears the
/// stored value.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UpdateProjectForm {
    /// Project to update.
    id: String,
    /// Replacement name.
    name: Option<String>,
    /// Replacement description; blank clears it.
    description: Option<String>,
    /// Replacement archival flag.
    is_archived: Option<String>,
}

/// Form fields accepted by the delete endpoint.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeleteProjectForm {
    /// Project to delete; its tasks are removed with it.
    id: String,
}

/// Query parameters for listing projects.
#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    pub status: Option<String>,
}

fn invalid_filter_error(field: &str, value: &str, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
    }))
}

fn parse_project_filter(query: ProjectListQuery) -> Result<ProjectFilter, Error> {
    let status = query
        .status
        .map(|raw| {
            ProjectStatus::from_str(&raw).map_err(|_| {
                invalid_filter_error("status", &raw, "status must be active or archived")
            })
        })
        .transpose()?;
    Ok(ProjectFilter { status })
}

/// Create a project from a form submission.
#[utoipa::path(
    post,
    path = "/api/v1/projects/create",
    request_body(
        content = CreateProjectForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Project>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "createProject",
    security(("SessionCookie" = []))
)]
#[post("/projects/create")]
pub async fn create_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: FormBody,
) -> ApiResult<HttpResponse> {
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state
        .projects
        .create_project(&ctx, &forms::submission(body))
        .await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Apply a partial update to a project from a form submission.
#[utoipa::path(
    post,
    path = "/api/v1/projects/update",
    request_body(
        content = UpdateProjectForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Project>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "updateProject",
    security(("SessionCookie" = []))
)]
#[post("/projects/update")]
pub async fn update_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: FormBody,
) -> ApiResult<HttpResponse> {
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state
        .projects
        .update_project(&ctx, &forms::submission(body))
        .await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Delete a project and its tasks, named by a form submission.
#[utoipa::path(
    post,
    path = "/api/v1/projects/delete",
    request_body(
        content = DeleteProjectForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Project>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "deleteProject",
    security(("SessionCookie" = []))
)]
#[post("/projects/delete")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: FormBody,
) -> ApiResult<HttpResponse> {
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state
        .projects
        .delete_project(&ctx, &forms::submission(body))
        .await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// List the caller's projects.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    params(
        ("status" = Option<String>, Query, description = "active or archived")
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Vec<Project>>),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "listProjects",
    security(("SessionCookie" = []))
)]
#[get("/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ProjectListQuery>,
) -> ApiResult<HttpResponse> {
    let filter = parse_project_filter(query.into_inner())?;
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state.projects.list_projects(&ctx, &filter).await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Fetch one project with its tasks.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(
        ("id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Option<ProjectWithTasks>>),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "getProject",
    security(("SessionCookie" = []))
)]
#[get("/projects/{id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let id = ProjectId::new(&raw)
        .map_err(|_| invalid_filter_error("id", &raw, "id must be a project id"))?;
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state.projects.find_project(&ctx, &id).await;
    Ok(HttpResponse::Ok().json(outcome))
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod projects_tests;
