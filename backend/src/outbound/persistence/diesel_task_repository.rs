//! PostgreSQL-backed `TaskRepository` implementation using Diesel ORM.
//!
//! Every statement filters on the owning user's id, so rows belonging to
//! someone else behave exactly like missing rows. Mutations that need the
//! resulting row run as execute-then-read-back; the composite foreign key
//! on `(project_id, author_id)` rejects inserts and moves that would attach
//! a task to another user's project.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ids::{ProjectId, TaskId, UserId};
use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::task::{NewTask, Task, TaskChanges, TaskQuery, TaskWithProject};

use super::diesel_project_repository::row_to_project;
use super::error_mapping::{diesel_error_into, pool_error_into};
use super::models::{NewTaskRow, ProjectRow, TaskRow, TaskUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{projects, tasks};

/// Diesel-backed implementation of the `TaskRepository` port.
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Pool checkout failures surface as connection errors.
fn checkout_error(error: PoolError) -> TaskRepositoryError {
    pool_error_into(error, TaskRepositoryError::connection)
}

/// Translate Diesel failures into the repository's error space.
fn statement_error(error: diesel::result::Error) -> TaskRepositoryError {
    diesel_error_into(
        error,
        TaskRepositoryError::query,
        TaskRepositoryError::connection,
    )
}

/// Convert a database row to a domain task.
fn row_to_task(row: TaskRow) -> Task {
    Task {
        id: TaskId::from_uuid(row.id),
        author_id: UserId::from_uuid(row.author_id),
        project_id: ProjectId::from_uuid(row.project_id),
        name: row.name,
        description: row.description,
        due_date: row.due_date,
        is_completed: row.is_completed,
        created_at: row.created_at,
    }
}

/// Borrow a domain change set as a Diesel changeset.
fn changeset_from(changes: &TaskChanges) -> TaskUpdate<'_> {
    TaskUpdate {
        name: changes.name.as_deref(),
        description: changes.description.as_ref().map(|value| value.as_deref()),
        project_id: changes.project_id.as_ref().map(|id| *id.as_uuid()),
        due_date: changes.due_date,
        is_completed: changes.is_completed,
    }
}

/// Fetch one of the owner's task rows.
async fn find_owned_row<C>(
    conn: &mut C,
    owner: &UserId,
    id: &TaskId,
) -> Result<Option<TaskRow>, TaskRepositoryError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    tasks::table
        .filter(tasks::id.eq(id.as_uuid()))
        .filter(tasks::author_id.eq(owner.as_uuid()))
        .select(TaskRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(statement_error)
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn insert(&self, task: &NewTask) -> Result<Task, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let new_row = NewTaskRow {
            id: *task.id.as_uuid(),
            author_id: *task.author_id.as_uuid(),
            project_id: *task.project_id.as_uuid(),
            name: &task.name,
            description: task.description.as_deref(),
            due_date: task.due_date,
        };

        diesel::insert_into(tasks::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(statement_error)?;

        let row = find_owned_row(&mut conn, &task.author_id, &task.id)
            .await?
            .ok_or_else(|| TaskRepositoryError::query("inserted task row missing"))?;
        Ok(row_to_task(row))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &TaskId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        if changes.is_empty() {
            let row = find_owned_row(&mut conn, owner, id).await?;
            return Ok(row.map(row_to_task));
        }

        let affected = diesel::update(
            tasks::table
                .filter(tasks::id.eq(id.as_uuid()))
                .filter(tasks::author_id.eq(owner.as_uuid())),
        )
        .set(&changeset_from(changes))
        .execute(&mut conn)
        .await
        .map_err(statement_error)?;

        if affected == 0 {
            return Ok(None);
        }

        let row = find_owned_row(&mut conn, owner, id).await?;
        Ok(row.map(row_to_task))
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &TaskId,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let Some(row) = find_owned_row(&mut conn, owner, id).await? else {
            return Ok(None);
        };

        let removed = diesel::delete(
            tasks::table
                .filter(tasks::id.eq(id.as_uuid()))
                .filter(tasks::author_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(statement_error)?;

        if removed == 0 {
            return Ok(None);
        }
        Ok(Some(row_to_task(row)))
    }

    async fn list(
        &self,
        owner: &UserId,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        // Joining the project row unconditionally keeps one code path; the
        // foreign key guarantees the join never drops a task.
        let mut rows = tasks::table
            .inner_join(projects::table)
            .select(TaskRow::as_select())
            .into_boxed();

        rows = rows.filter(tasks::author_id.eq(*owner.as_uuid()));
        if let Some(project) = &query.project {
            rows = rows.filter(tasks::project_id.eq(*project.as_uuid()));
        }
        if let Some(bound) = query.due_before {
            rows = rows.filter(tasks::due_date.le(bound));
        }
        if let Some(window) = query.due_within {
            rows = rows.filter(tasks::due_date.between(window.start(), window.end()));
        }
        if let Some(completed) = query.completed {
            rows = rows.filter(tasks::is_completed.eq(completed));
        }
        if let Some(archived) = query.project_archived {
            rows = rows.filter(projects::is_archived.eq(archived));
        }

        let rows: Vec<TaskRow> = rows
            .order((tasks::created_at.asc(), tasks::id.asc()))
            .load(&mut conn)
            .await
            .map_err(statement_error)?;

        Ok(rows.into_iter().map(row_to_task).collect())
    }

    async fn find_with_project(
        &self,
        owner: &UserId,
        id: &TaskId,
    ) -> Result<Option<TaskWithProject>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let row: Option<(TaskRow, ProjectRow)> = tasks::table
            .inner_join(projects::table)
            .filter(tasks::id.eq(id.as_uuid()))
            .filter(tasks::author_id.eq(owner.as_uuid()))
            .select((TaskRow::as_select(), ProjectRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(statement_error)?;

        Ok(row.map(|(task, project)| TaskWithProject {
            task: row_to_task(task),
            project: row_to_project(project),
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.
    use chrono::{TimeZone as _, Utc};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn task_row() -> TaskRow {
        TaskRow {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            name: "water the plants".to_owned(),
            description: Some("the ones on the balcony".to_owned()),
            due_date: Utc.with_ymd_and_hms(2026, 3, 14, 17, 0, 0).single(),
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = checkout_error(PoolError::Checkout("connection refused".into()));

        assert!(matches!(mapped, TaskRepositoryError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_a_query_error() {
        let mapped = statement_error(diesel::result::Error::NotFound);

        assert!(matches!(mapped, TaskRepositoryError::Query { .. }));
    }

    #[rstest]
    fn rows_convert_with_every_field(task_row: TaskRow) {
        let expected_due = task_row.due_date;
        let task = row_to_task(task_row);

        assert_eq!(task.name, "water the plants");
        assert_eq!(task.description.as_deref(), Some("the ones on the balcony"));
        assert_eq!(task.due_date, expected_due);
        assert!(!task.is_completed);
    }

    #[rstest]
    fn a_cleared_description_survives_the_changeset_borrow() {
        let changes = TaskChanges {
            description: Some(None),
            ..TaskChanges::default()
        };

        let changeset = changeset_from(&changes);

        assert_eq!(changeset.description, Some(None));
        assert_eq!(changeset.name, None);
        assert_eq!(changeset.due_date, None);
    }

    #[rstest]
    fn a_moved_task_carries_the_target_project_id() {
        let target = ProjectId::random();
        let changes = TaskChanges {
            project_id: Some(target.clone()),
            ..TaskChanges::default()
        };

        let changeset = changeset_from(&changes);

        assert_eq!(changeset.project_id, Some(*target.as_uuid()));
    }
}
