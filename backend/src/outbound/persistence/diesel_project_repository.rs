//! PostgreSQL-backed `ProjectRepository` implementation using Diesel ORM.
//!
//! Statements are owner-scoped throughout, so another user's project rows
//! look exactly like missing ones. Deleting a project relies on the
//! `ON DELETE CASCADE` clause of the tasks table to sweep its tasks in the
//! same statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ids::{ProjectId, TaskId, UserId};
use crate::domain::ports::{ProjectRepository, ProjectRepositoryError};
use crate::domain::project::{
    NewProject, Project, ProjectChanges, ProjectFilter, ProjectStatus, ProjectWithTasks,
};
use crate::domain::task::Task;

use super::error_mapping::{diesel_error_into, pool_error_into};
use super::models::{NewProjectRow, ProjectRow, ProjectUpdate, TaskRow};
use super::pool::{DbPool, PoolError};
use super::schema::{projects, tasks};

/// Diesel-backed implementation of the `ProjectRepository` port.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Pool checkout failures surface as connection errors.
fn checkout_error(error: PoolError) -> ProjectRepositoryError {
    pool_error_into(error, ProjectRepositoryError::connection)
}

/// Translate Diesel failures into the repository's error space.
fn statement_error(error: diesel::result::Error) -> ProjectRepositoryError {
    diesel_error_into(
        error,
        ProjectRepositoryError::query,
        ProjectRepositoryError::connection,
    )
}

/// Convert a database row to a domain project.
pub(super) fn row_to_project(row: ProjectRow) -> Project {
    Project {
        id: ProjectId::from_uuid(row.id),
        author_id: UserId::from_uuid(row.author_id),
        name: row.name,
        description: row.description,
        is_archived: row.is_archived,
        created_at: row.created_at,
    }
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
fn changeset_from(changes: &ProjectChanges) -> ProjectUpdate<'_> {
    ProjectUpdate {
        name: changes.name.as_deref(),
        description: changes.description.as_ref().map(|value| value.as_deref()),
        is_archived: changes.is_archived,
    }
}

/// Fetch one of the owner's project rows.
async fn find_owned_row<C>(
    conn: &mut C,
    owner: &UserId,
    id: &ProjectId,
) -> Result<Option<ProjectRow>, ProjectRepositoryError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    projects::table
        .filter(projects::id.eq(id.as_uuid()))
        .filter(projects::author_id.eq(owner.as_uuid()))
        .select(ProjectRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(statement_error)
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let new_row = NewProjectRow {
            id: *project.id.as_uuid(),
            author_id: *project.author_id.as_uuid(),
            name: &project.name,
            description: project.description.as_deref(),
            is_archived: project.is_archived,
        };

        diesel::insert_into(projects::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(statement_error)?;

        let row = find_owned_row(&mut conn, &project.author_id, &project.id)
            .await?
            .ok_or_else(|| ProjectRepositoryError::query("inserted project row missing"))?;
        Ok(row_to_project(row))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        if changes.is_empty() {
            let row = find_owned_row(&mut conn, owner, id).await?;
            return Ok(row.map(row_to_project));
        }

        let affected = diesel::update(
            projects::table
                .filter(projects::id.eq(id.as_uuid()))
                .filter(projects::author_id.eq(owner.as_uuid())),
        )
        .set(&changeset_from(changes))
        .execute(&mut conn)
        .await
        .map_err(statement_error)?;

        if affected == 0 {
            return Ok(None);
        }

        let row = find_owned_row(&mut conn, owner, id).await?;
        Ok(row.map(row_to_project))
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &ProjectId,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let Some(row) = find_owned_row(&mut conn, owner, id).await? else {
            return Ok(None);
        };

        let removed = diesel::delete(
            projects::table
                .filter(projects::id.eq(id.as_uuid()))
                .filter(projects::author_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(statement_error)?;

        if removed == 0 {
            return Ok(None);
        }
        Ok(Some(row_to_project(row)))
    }

    async fn list(
        &self,
        owner: &UserId,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let mut rows = projects::table
            .select(ProjectRow::as_select())
            .into_boxed();

        rows = rows.filter(projects::author_id.eq(*owner.as_uuid()));
        if let Some(status) = filter.status {
            rows = rows.filter(projects::is_archived.eq(matches!(status, ProjectStatus::Archived)));
        }

        let rows: Vec<ProjectRow> = rows
            .order((projects::created_at.asc(), projects::id.asc()))
            .load(&mut conn)
            .await
            .map_err(statement_error)?;

        Ok(rows.into_iter().map(row_to_project).collect())
    }

    async fn find_with_tasks(
        &self,
        owner: &UserId,
        id: &ProjectId,
    ) -> Result<Option<ProjectWithTasks>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let Some(row) = find_owned_row(&mut conn, owner, id).await? else {
            return Ok(None);
        };

        let task_rows: Vec<TaskRow> = tasks::table
            .filter(tasks::project_id.eq(id.as_uuid()))
            .filter(tasks::author_id.eq(owner.as_uuid()))
            .select(TaskRow::as_select())
            .order((tasks::created_at.asc(), tasks::id.asc()))
            .load(&mut conn)
            .await
            .map_err(statement_error)?;

        Ok(Some(ProjectWithTasks {
            project: row_to_project(row),
            tasks: task_rows.into_iter().map(row_to_task).collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion.
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn project_row() -> ProjectRow {
        ProjectRow {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            name: "house move".to_owned(),
            description: None,
            is_archived: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = checkout_error(PoolError::Build("bad database url".into()));

        assert!(matches!(mapped, ProjectRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn diesel_not_found_maps_to_a_query_error() {
        let mapped = statement_error(diesel::result::Error::NotFound);

        assert!(matches!(mapped, ProjectRepositoryError::Query { .. }));
    }

    #[rstest]
    fn archived_rows_convert_to_archived_projects(project_row: ProjectRow) {
        let project = row_to_project(project_row);

        assert_eq!(project.name, "house move");
        assert_eq!(project.status(), ProjectStatus::Archived);
        assert_eq!(project.description, None);
    }

    #[rstest]
    fn an_archive_toggle_leaves_other_columns_alone() {
        let changes = ProjectChanges {
            is_archived: Some(true),
            ..ProjectChanges::default()
        };

        let changeset = changeset_from(&changes);

        assert_eq!(changeset.is_archived, Some(true));
        assert_eq!(changeset.name, None);
        assert_eq!(changeset.description, None);
    }
}
