//! Project domain service.
//!
//! Implements the [`ProjectActions`] driving port with the same operation
//! order as the task service. Deleting a project also invalidates the task
//! scope, because the cascade removes the project's tasks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::ids::{ProjectId, UserId};
use crate::domain::input::SubmissionInput;
use crate::domain::outcome::ActionResult;
use crate::domain::ports::{ProjectActions, ProjectRepository, RefreshPublisher, RefreshScope};
use crate::domain::principal::PrincipalContext;
use crate::domain::project::{
    CREATE_PROJECT, DELETE_PROJECT, NewProject, Project, ProjectChanges, ProjectFilter,
    ProjectWithTasks, UPDATE_PROJECT, fields,
};
use crate::domain::schema::ValidatedInput;

/// Project service implementing the driving port.
#[derive(Clone)]
pub struct ProjectService<R, P> {
    projects: Arc<R>,
    refresh: Arc<P>,
}

impl<R, P> ProjectService<R, P> {
    /// Create a new service over the given ports.
    pub fn new(projects: Arc<R>, refresh: Arc<P>) -> Self {
        Self { projects, refresh }
    }
}

impl<R, P> ProjectService<R, P>
where
    R: ProjectRepository,
    P: RefreshPublisher,
{
    async fn publish_refresh(&self, user: &UserId, scopes: &[RefreshScope]) {
        for scope in scopes {
            if let Err(err) = self.refresh.publish(user, *scope).await {
                warn!(error = %err, scope = %scope, "project refresh hint dropped");
            }
        }
    }

    fn changes_from(validated: &ValidatedInput) -> ProjectChanges {
        let description = if validated.cleared(fields::DESCRIPTION) {
            Some(None)
        } else {
            validated
                .text(fields::DESCRIPTION)
                .map(|text| Some(text.to_owned()))
        };
        ProjectChanges {
            name: validated.text(fields::NAME).map(str::to_owned),
            description,
            is_archived: validated.flag(fields::ARCHIVED),
        }
    }
}

#[async_trait]
impl<R, P> ProjectActions for ProjectService<R, P>
where
    R: ProjectRepository,
    P: RefreshPublisher,
{
    async fn create_project(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Project> {
        let validated = match CREATE_PROJECT.evaluate(input) {
            Ok(validated) => validated,
            Err(errors) => return ActionResult::failure(errors),
        };
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        let Some(name) = validated.text(fields::NAME) else {
            error!(
                operation = CREATE_PROJECT.operation,
                "required fields absent after validation"
            );
            return ActionResult::masked_internal();
        };

        let new_project = NewProject {
            id: ProjectId::random(),
            author_id: principal.user_id().clone(),
            name: name.to_owned(),
            description: validated.text(fields::DESCRIPTION).map(str::to_owned),
            is_archived: validated.flag(fields::ARCHIVED).unwrap_or(false),
        };

        match self.projects.insert(&new_project).await {
            Ok(project) => {
                self.publish_refresh(principal.user_id(), &[RefreshScope::Projects])
                    .await;
                ActionResult::success(project)
            }
            Err(err) => {
                error!(error = %err, "project creation failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn update_project(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Project> {
        let validated = match UPDATE_PROJECT.evaluate(input) {
            Ok(validated) => validated,
            Err(errors) => return ActionResult::failure(errors),
        };
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        let Some(id) = validated.identifier(fields::ID) else {
            error!(
                operation = UPDATE_PROJECT.operation,
                "required fields absent after validation"
            );
            return ActionResult::masked_internal();
        };

        let id = ProjectId::from_uuid(id);
        let changes = Self::changes_from(&validated);
        match self
            .projects
            .update(principal.user_id(), &id, &changes)
            .await
        {
            Ok(Some(project)) => {
                self.publish_refresh(principal.user_id(), &[RefreshScope::Projects])
                    .await;
                ActionResult::success(project)
            }
            Ok(None) => {
                debug!(project_id = %id, "update matched no owned project");
                ActionResult::masked_internal()
            }
            Err(err) => {
                error!(error = %err, "project update failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn delete_project(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Project> {
        let validated = match DELETE_PROJECT.evaluate(input) {
            Ok(validated) => validated,
            Err(errors) => return ActionResult::failure(errors),
        };
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        let Some(id) = validated.identifier(fields::ID) else {
            error!(
                operation = DELETE_PROJECT.operation,
                "required fields absent after validation"
            );
            return ActionResult::masked_internal();
        };

        let id = ProjectId::from_uuid(id);
        match self.projects.delete(principal.user_id(), &id).await {
            Ok(Some(project)) => {
                self.publish_refresh(
                    principal.user_id(),
                    &[RefreshScope::Projects, RefreshScope::Tasks],
                )
                .await;
                ActionResult::success(project)
            }
            Ok(None) => {
                debug!(project_id = %id, "delete matched no owned project");
                ActionResult::masked_internal()
            }
            Err(err) => {
                error!(error = %err, "project deletion failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn list_projects(
        &self,
        ctx: &PrincipalContext,
        filter: &ProjectFilter,
    ) -> ActionResult<Vec<Project>> {
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        match self.projects.list(principal.user_id(), filter).await {
            Ok(projects) => ActionResult::success(projects),
            Err(err) => {
                error!(error = %err, "project listing failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn find_project(
        &self,
        ctx: &PrincipalContext,
        id: &ProjectId,
    ) -> ActionResult<Option<ProjectWithTasks>> {
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        match self.projects.find_with_tasks(principal.user_id(), id).await {
            Ok(found) => ActionResult::success(found),
            Err(err) => {
                error!(error = %err, "project lookup failed");
                ActionResult::masked_internal()
            }
        }
    }
}

#[cfg(test)]
#[path = "project_service_tests.rs"]
mod tests;
