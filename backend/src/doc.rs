//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (tasks, projects,
//!   account, auth)
//! - **Schemas**: The action envelope and its payload aggregates, the form
//!   bodies the action endpoints accept, and wrappers ([`ErrorSchema`],
//!   [`ErrorCodeSchema`]) that describe the transport error without
//!   coupling domain types to the utoipa framework
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    ActionResult, FieldError, Profile, Project, ProjectWithTasks, Task, TaskWithProject,
};
use crate::inbound::http::account::TimeZoneForm;
use crate::inbound::http::projects::{CreateProjectForm, DeleteProjectForm, UpdateProjectForm};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::tasks::{CreateTaskForm, DeleteTaskForm, UpdateTaskForm};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued when the sign-in callback completes.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Daylist backend API",
        description = "Form-action interface for tasks, projects, and the caller's account. \
            Mutations answer HTTP 200 with a data-or-errors envelope; transport faults use \
            conventional error statuses.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::get_task,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::update_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::account::get_account,
        crate::inbound::http::account::update_time_zone,
        crate::inbound::http::account::delete_account,
        crate::inbound::http::auth::begin_sign_in,
        crate::inbound::http::auth::sign_in_callback,
        crate::inbound::http::auth::sign_out,
    ),
    components(schemas(
        ActionResult<Task>,
        ActionResult<Vec<Task>>,
        ActionResult<Option<TaskWithProject>>,
        ActionResult<Project>,
        ActionResult<Vec<Project>>,
        ActionResult<Option<ProjectWithTasks>>,
        ActionResult<Profile>,
        FieldError,
        Task,
        TaskWithProject,
        Project,
        ProjectWithTasks,
        Profile,
        CreateTaskForm,
        UpdateTaskForm,
        DeleteTaskForm,
        CreateProjectForm,
        UpdateProjectForm,
        DeleteProjectForm,
        TimeZoneForm,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "tasks", description = "Task form actions and reads"),
        (name = "projects", description = "Project form actions and reads"),
        (name = "account", description = "Account profile and preferences"),
        (name = "auth", description = "Brokered sign-in and sign-out")
    )
)]
pub struct ApiDoc;
