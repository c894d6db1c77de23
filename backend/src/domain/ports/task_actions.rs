//! Driving port for task form actions and reads.
//!
//! Inbound adapters hand over the raw submission and the caller's principal
//! context; the implementation validates, persists, and reports through the
//! action envelope. The methods are infallible on purpose: every expected
//! failure travels inside the returned [`ActionResult`].

use async_trait::async_trait;

use crate::domain::ids::TaskId;
use crate::domain::input::SubmissionInput;
use crate::domain::outcome::ActionResult;
use crate::domain::principal::PrincipalContext;
use crate::domain::task::{Task, TaskFilter, TaskWithProject};

/// Driving port for task operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskActions: Send + Sync {
    /// Validate a create submission and persist the new task.
    async fn create_task(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Task>;

    /// Validate an update submission and apply it to the caller's task.
    ///
    /// Fields absent from the submission keep their stored values.
    async fn update_task(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Task>;

    /// Validate a delete submission and remove the caller's task.
    async fn delete_task(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Task>;

    /// List the caller's tasks, with due-date filters interpreted in the
    /// caller's time zone.
    async fn list_tasks(
        &self,
        ctx: &PrincipalContext,
        filter: &TaskFilter,
    ) -> ActionResult<Vec<Task>>;

    /// Fetch one of the caller's tasks with its project, or `None` when the
    /// id matches nothing the caller owns.
    async fn find_task(
        &self,
        ctx: &PrincipalContext,
        id: &TaskId,
    ) -> ActionResult<Option<TaskWithProject>>;
}
