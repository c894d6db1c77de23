//! Task HTTP handlers.
//!
//! ```text
//! POST /api/v1/tasks/create
//! POST /api/v1/tasks/update
//! POST /api/v1/tasks/delete
//! GET  /api/v1/tasks
//! GET  /api/v1/tasks/{id}
//! ```
//!
//! Mutations accept URL-encoded form bodies and answer with the action
//! envelope at status 200 for success and expected failure alike; only
//! transport-level problems (malformed filters, framework faults) surface
//! through error statuses.

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::task::{DueFilter, TaskFilter, TaskStatus};
use crate::domain::{ActionResult, Error, ProjectId, ProjectStatus, Task, TaskId, TaskWithProject};
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
pub struct CreateTaskForm {
    /// Task name; required, at most 500 characters.
    name: String,
    /// Owning project id.
    project_id: String,
    /// Optional description, at most 500 characters.
    description: Option<String>,
    /// Optional due date, RFC 3339 or `YYYY-MM-DD`.
    due_date: Option<String>,
    /// Optional completion flag, `true` or `false`.
    is_completed: Option<String>,
}

/// Form fields accepted by the update endpoint.
///
/// Absent fields keep their stored values; a blank `description` or
/// `dueDate` clears the stored value.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UpdateTaskForm {
    /// Task to update.
    id: String,
    /// Replacement name.
    name: Option<String>,
    /// Replacement description; blank clears it.
    description: Option<String>,
    /// Move the task to another project.
    project_id: Option<String>,
    /// Replacement due date; blank clears it.
    due_date: Option<String>,
    /// Replacement completion flag.
    is_completed: Option<String>,
}

/// Form fields accepted by the delete endpoint.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeleteTaskForm {
    /// Task to delete.
    id: String,
}

/// Query parameters for listing tasks.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub project: Option<String>,
    pub due_by: Option<String>,
    pub due_on: Option<String>,
    pub status: Option<String>,
    pub project_status: Option<String>,
}

fn invalid_filter_error(field: &str, value: &str, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
    }))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, Error> {
    NaiveDate::from_str(raw)
        .map_err(|_| invalid_filter_error(field, raw, "due date filters must be YYYY-MM-DD dates"))
}

fn parse_due(due_by: Option<String>, due_on: Option<String>) -> Result<Option<DueFilter>, Error> {
    match (due_by, due_on) {
        (Some(_), Some(_)) => Err(Error::invalid_request("filter by due_by or due_on, not both")
            .with_details(json!({ "fields": ["due_by", "due_on"] }))),
        (Some(raw), None) => Ok(Some(DueFilter::By(parse_date("due_by", &raw)?))),
        (None, Some(raw)) => Ok(Some(DueFilter::On(parse_date("due_on", &raw)?))),
        (None, None) => Ok(None),
    }
}

fn parse_task_filter(query: TaskListQuery) -> Result<TaskFilter, Error> {
    let project = query
        .project
        .map(|raw| {
            ProjectId::new(&raw)
                .map_err(|_| invalid_filter_error("project", &raw, "project must be a project id"))
        })
        .transpose()?;
    let due = parse_due(query.due_by, query.due_on)?;
    let status = query
        .status
        .map(|raw| {
            TaskStatus::from_str(&raw).map_err(|_| {
                invalid_filter_error("status", &raw, "status must be pending or completed")
            })
        })
        .transpose()?;
    let project_status = query
        .project_status
        .map(|raw| {
            ProjectStatus::from_str(&raw).map_err(|_| {
                invalid_filter_error(
                    "project_status",
                    &raw,
                    "project_status must be active or archived",
                )
            })
        })
        .transpose()?;

    Ok(TaskFilter {
        project,
        due,
        status,
        project_status,
    })
}

/// Create a task from a form submission.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/create",
    request_body(
        content = CreateTaskForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Task>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "createTask",
    security(("SessionCookie" = []))
)]
#[post("/tasks/create")]
pub async fn create_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: FormBody,
) -> ApiResult<HttpResponse> {
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state.tasks.create_task(&ctx, &forms::submission(body)).await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Apply a partial update to a task from a form submission.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/update",
    request_body(
        content = UpdateTaskForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Task>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "updateTask",
    security(("SessionCookie" = []))
)]
#[post("/tasks/update")]
pub async fn update_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: FormBody,
) -> ApiResult<HttpResponse> {
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state.tasks.update_task(&ctx, &forms::submission(body)).await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Delete a task named by a form submission.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/delete",
    request_body(
        content = DeleteTaskForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Task>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask",
    security(("SessionCookie" = []))
)]
#[post("/tasks/delete")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: FormBody,
) -> ApiResult<HttpResponse> {
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state.tasks.delete_task(&ctx, &forms::submission(body)).await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// List the caller's tasks.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(
        ("project" = Option<String>, Query, description = "Restrict to one project id"),
        ("due_by" = Option<String>, Query, description = "Tasks due on or before this date (YYYY-MM-DD)"),
        ("due_on" = Option<String>, Query, description = "Tasks due within this date (YYYY-MM-DD)"),
        ("status" = Option<String>, Query, description = "pending or completed"),
        ("project_status" = Option<String>, Query, description = "active or archived")
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Vec<Task>>),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "listTasks",
    security(("SessionCookie" = []))
)]
#[get("/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<TaskListQuery>,
) -> ApiResult<HttpResponse> {
    let filter = parse_task_filter(query.into_inner())?;
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state.tasks.list_tasks(&ctx, &filter).await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Fetch one task with its owning project.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Option<TaskWithProject>>),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "getTask",
    security(("SessionCookie" = []))
)]
#[get("/tasks/{id}")]
pub async fn get_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let id = TaskId::new(&raw)
        .map_err(|_| invalid_filter_error("id", &raw, "id must be a task id"))?;
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state.tasks.find_task(&ctx, &id).await;
    Ok(HttpResponse::Ok().json(outcome))
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tasks_tests;
