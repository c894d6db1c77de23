//! Task domain service.
//!
//! Implements the [`TaskActions`] driving port over the task repository and
//! the refresh publisher. Every operation follows the same order: validate
//! the submission, gate on the principal, touch the repository, publish a
//! refresh hint for successful mutations, and answer with the envelope.
//! Repository faults are logged here and leave the service as the generic
//! internal-failure message, never as backend detail.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::ids::{ProjectId, TaskId, UserId};
use crate::domain::input::SubmissionInput;
use crate::domain::outcome::ActionResult;
use crate::domain::ports::{RefreshPublisher, RefreshScope, TaskActions, TaskRepository};
use crate::domain::principal::PrincipalContext;
use crate::domain::project::ProjectStatus;
use crate::domain::schema::ValidatedInput;
use crate::domain::task::{
    CREATE_TASK, DELETE_TASK, DueFilter, NewTask, Task, TaskChanges, TaskFilter, TaskQuery,
    TaskStatus, TaskWithProject, UPDATE_TASK, fields,
};
use crate::domain::time_zone::TimeZone;

/// Task service implementing the driving port.
#[derive(Clone)]
pub struct TaskService<R, P> {
    tasks: Arc<R>,
    refresh: Arc<P>,
}

impl<R, P> TaskService<R, P> {
    /// Create a new service over the given ports.
    pub fn new(tasks: Arc<R>, refresh: Arc<P>) -> Self {
        Self { tasks, refresh }
    }
}

impl<R, P> TaskService<R, P>
where
    R: TaskRepository,
    P: RefreshPublisher,
{
    async fn publish_refresh(&self, user: &UserId) {
        if let Err(err) = self.refresh.publish(user, RefreshScope::Tasks).await {
            warn!(error = %err, "task refresh hint dropped");
        }
    }

    /// Resolve a user-facing filter into repository terms.
    ///
    /// Calendar days are anchored in the caller's time zone here, so the
    /// repository only ever compares UTC instants.
    fn resolve_filter(filter: &TaskFilter, zone: &TimeZone) -> TaskQuery {
        let (due_before, due_within) = match filter.due {
            Some(DueFilter::By(day)) => (Some(zone.day_window(day).end()), None),
            Some(DueFilter::On(day)) => (None, Some(zone.day_window(day))),
            None => (None, None),
        };
        TaskQuery {
            project: filter.project.clone(),
            due_before,
            due_within,
            completed: filter.status.map(|status| status == TaskStatus::Completed),
            project_archived: filter
                .project_status
                .map(|status| status == ProjectStatus::Archived),
        }
    }

    fn changes_from(validated: &ValidatedInput) -> TaskChanges {
        let description = if validated.cleared(fields::DESCRIPTION) {
            Some(None)
        } else {
            validated
                .text(fields::DESCRIPTION)
                .map(|text| Some(text.to_owned()))
        };
        let due_date = if validated.cleared(fields::DUE_DATE) {
            Some(None)
        } else {
            validated.instant(fields::DUE_DATE).map(Some)
        };
        TaskChanges {
            name: validated.text(fields::NAME).map(str::to_owned),
            description,
            project_id: validated
                .identifier(fields::PROJECT)
                .map(ProjectId::from_uuid),
            due_date,
            is_completed: validated.flag(fields::COMPLETED),
        }
    }
}

#[async_trait]
impl<R, P> TaskActions for TaskService<R, P>
where
    R: TaskRepository,
    P: RefreshPublisher,
{
    async fn create_task(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Task> {
        let validated = match CREATE_TASK.evaluate(input) {
            Ok(validated) => validated,
            Err(errors) => return ActionResult::failure(errors),
        };
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        let (Some(name), Some(project)) = (
            validated.text(fields::NAME),
            validated.identifier(fields::PROJECT),
        ) else {
            error!(operation = CREATE_TASK.operation, "required fields absent after validation");
            return ActionResult::masked_internal();
        };

        let new_task = NewTask {
            id: TaskId::random(),
            author_id: principal.user_id().clone(),
            project_id: ProjectId::from_uuid(project),
            name: name.to_owned(),
            description: validated.text(fields::DESCRIPTION).map(str::to_owned),
            due_date: validated.instant(fields::DUE_DATE),
        };

        match self.tasks.insert(&new_task).await {
            Ok(task) => {
                self.publish_refresh(principal.user_id()).await;
                ActionResult::success(task)
            }
            Err(err) => {
                error!(error = %err, "task creation failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn update_task(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Task> {
        let validated = match UPDATE_TASK.evaluate(input) {
            Ok(validated) => validated,
            Err(errors) => return ActionResult::failure(errors),
        };
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        let Some(id) = validated.identifier(fields::ID) else {
            error!(operation = UPDATE_TASK.operation, "required fields absent after validation");
            return ActionResult::masked_internal();
        };

        let id = TaskId::from_uuid(id);
        let changes = Self::changes_from(&validated);
        match self.tasks.update(principal.user_id(), &id, &changes).await {
            Ok(Some(task)) => {
                self.publish_refresh(principal.user_id()).await;
                ActionResult::success(task)
            }
            Ok(None) => {
                debug!(task_id = %id, "update matched no owned task");
                ActionResult::masked_internal()
            }
            Err(err) => {
                error!(error = %err, "task update failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn delete_task(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Task> {
        let validated = match DELETE_TASK.evaluate(input) {
            Ok(validated) => validated,
            Err(errors) => return ActionResult::failure(errors),
        };
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        let Some(id) = validated.identifier(fields::ID) else {
            error!(operation = DELETE_TASK.operation, "required fields absent after validation");
            return ActionResult::masked_internal();
        };

        let id = TaskId::from_uuid(id);
        match self.tasks.delete(principal.user_id(), &id).await {
            Ok(Some(task)) => {
                self.publish_refresh(principal.user_id()).await;
                ActionResult::success(task)
            }
            Ok(None) => {
                debug!(task_id = %id, "delete matched no owned task");
                ActionResult::masked_internal()
            }
            Err(err) => {
                error!(error = %err, "task deletion failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn list_tasks(
        &self,
        ctx: &PrincipalContext,
        filter: &TaskFilter,
    ) -> ActionResult<Vec<Task>> {
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        let query = Self::resolve_filter(filter, principal.time_zone());
        match self.tasks.list(principal.user_id(), &query).await {
            Ok(tasks) => ActionResult::success(tasks),
            Err(err) => {
                error!(error = %err, "task listing failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn find_task(
        &self,
        ctx: &PrincipalContext,
        id: &TaskId,
    ) -> ActionResult<Option<TaskWithProject>> {
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        match self.tasks.find_with_project(principal.user_id(), id).await {
            Ok(found) => ActionResult::success(found),
            Err(err) => {
                error!(error = %err, "task lookup failed");
                ActionResult::masked_internal()
            }
        }
    }
}

#[cfg(test)]
#[path = "task_service_tests.rs"]
mod tests;
