//! Driving port for project form actions and reads.

use async_trait::async_trait;

use crate::domain::ids::ProjectId;
use crate::domain::input::SubmissionInput;
use crate::domain::outcome::ActionResult;
use crate::domain::principal::PrincipalContext;
use crate::domain::project::{Project, ProjectFilter, ProjectWithTasks};

/// Driving port for project operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectActions: Send + Sync {
    /// Validate a create submission and persist the new project.
    async fn create_project(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Project>;

    /// Validate an update submission and apply it to the caller's project.
    ///
    /// Fields absent from the submission keep their stored values.
    async fn update_project(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Project>;

    /// Validate a delete submission and remove the caller's project along
    /// with its tasks.
    async fn delete_project(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Project>;

    /// List the caller's projects.
    async fn list_projects(
        &self,
        ctx: &PrincipalContext,
        filter: &ProjectFilter,
    ) -> ActionResult<Vec<Project>>;

    /// Fetch one of the caller's projects with its tasks, or `None` when
    /// the id matches nothing the caller owns.
    async fn find_project(
        &self,
        ctx: &PrincipalContext,
        id: &ProjectId,
    ) -> ActionResult<Option<ProjectWithTasks>>;
}
