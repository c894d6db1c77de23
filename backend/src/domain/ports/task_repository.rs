//! Driven port for task persistence.
//!
//! Every method takes the owning user's id and scopes its work to rows that
//! user authored. A mutation that matches no owned row reports `Ok(None)`
//! rather than an error, so callers cannot tell "not yours" apart from
//! "does not exist".

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::ids::{TaskId, UserId};
use crate::domain::project::Project;
use crate::domain::task::{NewTask, Task, TaskChanges, TaskQuery, TaskWithProject};

define_port_error! {
    /// Failures surfaced by task persistence adapters.
    pub enum TaskRepositoryError {
        /// Lost or unavailable backing connection.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Statement construction or execution failure.
        Query { message: String } => "task repository query failed: {message}",
    }
}

/// Driven port for task persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task and return the persisted row.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store rejects the insert, including
    /// when the referenced project does not exist or belongs to another user.
    async fn insert(&self, task: &NewTask) -> Result<Task, TaskRepositoryError>;

    /// Apply changes to one of the owner's tasks.
    ///
    /// Returns the updated row, or `None` when no task with that id belongs
    /// to the owner. An empty change set returns the current row unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn update(
        &self,
        owner: &UserId,
        id: &TaskId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, TaskRepositoryError>;

    /// Delete one of the owner's tasks, returning the removed row.
    ///
    /// Returns `None` when no task with that id belongs to the owner.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn delete(
        &self,
        owner: &UserId,
        id: &TaskId,
    ) -> Result<Option<Task>, TaskRepositoryError>;

    /// List the owner's tasks matching the query, ordered by creation time
    /// ascending.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn list(&self, owner: &UserId, query: &TaskQuery)
    -> Result<Vec<Task>, TaskRepositoryError>;

    /// Fetch one of the owner's tasks together with its project.
    ///
    /// Returns `None` when no task with that id belongs to the owner.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn find_with_project(
        &self,
        owner: &UserId,
        id: &TaskId,
    ) -> Result<Option<TaskWithProject>, TaskRepositoryError>;
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    projects: HashMap<crate::domain::ids::ProjectId, Project>,
}

/// In-memory implementation backed by a mutex-guarded map.
///
/// Used by handler and service tests that need real persistence semantics
/// (owner scoping, partial updates) without a database. Seed projects before
/// exercising queries that join on them.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    state: Mutex<InMemoryTaskState>,
}

impl InMemoryTaskRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project row so joins and archival filters can resolve it.
    pub fn seed_project(&self, project: Project) {
        let mut state = self.lock();
        state.projects.insert(project.id.clone(), project);
    }

    /// Seed a task row directly, bypassing [`TaskRepository::insert`].
    pub fn seed_task(&self, task: Task) {
        let mut state = self.lock();
        state.tasks.insert(task.id.clone(), task);
    }

    /// Number of stored tasks, for persistence-count assertions.
    pub fn task_count(&self) -> usize {
        self.lock().tasks.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryTaskState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn matches_query(state: &InMemoryTaskState, task: &Task, query: &TaskQuery) -> bool {
    let project_ok = query
        .project
        .as_ref()
        .is_none_or(|project| task.project_id == *project);
    let due_before_ok = query
        .due_before
        .is_none_or(|bound| task.due_date.is_some_and(|due| due <= bound));
    let due_within_ok = query.due_within.is_none_or(|window| {
        task.due_date
            .is_some_and(|due| due >= window.start() && due <= window.end())
    });
    let completed_ok = query
        .completed
        .is_none_or(|completed| task.is_completed == completed);
    let archive_ok = query.project_archived.is_none_or(|archived| {
        state
            .projects
            .get(&task.project_id)
            .is_some_and(|project| project.is_archived == archived)
    });
    project_ok && due_before_ok && due_within_ok && completed_ok && archive_ok
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &NewTask) -> Result<Task, TaskRepositoryError> {
        let row = Task::builder(
            task.id.clone(),
            task.author_id.clone(),
            task.project_id.clone(),
        )
        .name(task.name.clone());
        let row = match &task.description {
            Some(description) => row.description(description.clone()),
            None => row,
        };
        let row = match task.due_date {
            Some(due) => row.due_date(due),
            None => row,
        };
        let row = row.build();
        let mut state = self.lock();
        state.tasks.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &TaskId,
        changes: &TaskChanges,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut state = self.lock();
        let Some(task) = state.tasks.get_mut(id) else {
            return Ok(None);
        };
        if task.author_id != *owner {
            return Ok(None);
        }
        if let Some(name) = &changes.name {
            task.name = name.clone();
        }
        if let Some(description) = &changes.description {
            task.description = description.clone();
        }
        if let Some(project_id) = &changes.project_id {
            task.project_id = project_id.clone();
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date;
        }
        if let Some(is_completed) = changes.is_completed {
            task.is_completed = is_completed;
        }
        Ok(Some(task.clone()))
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &TaskId,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut state = self.lock();
        let owned = state
            .tasks
            .get(id)
            .is_some_and(|task| task.author_id == *owner);
        if !owned {
            return Ok(None);
        }
        Ok(state.tasks.remove(id))
    }

    async fn list(
        &self,
        owner: &UserId,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let state = self.lock();
        let mut rows: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.author_id == *owner)
            .filter(|task| matches_query(&state, task, query))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_ref().cmp(b.id.as_ref()))
        });
        Ok(rows)
    }

    async fn find_with_project(
        &self,
        owner: &UserId,
        id: &TaskId,
    ) -> Result<Option<TaskWithProject>, TaskRepositoryError> {
        let state = self.lock();
        let Some(task) = state.tasks.get(id) else {
            return Ok(None);
        };
        if task.author_id != *owner {
            return Ok(None);
        }
        let Some(project) = state.projects.get(&task.project_id) else {
            return Ok(None);
        };
        Ok(Some(TaskWithProject {
            task: task.clone(),
            project: project.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{TimeZone as _, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ids::ProjectId;

    fn new_task(author: &UserId, project: &ProjectId, name: &str) -> NewTask {
        NewTask {
            id: TaskId::random(),
            author_id: author.clone(),
            project_id: project.clone(),
            name: name.to_owned(),
            description: None,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn update_ignores_tasks_owned_by_someone_else() {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::random();
        let task = repo
            .insert(&new_task(&owner, &ProjectId::random(), "water plants"))
            .await
            .expect("insert");

        let changes = TaskChanges {
            name: Some("stolen".to_owned()),
            ..TaskChanges::default()
        };
        let updated = repo
            .update(&UserId::random(), &task.id, &changes)
            .await
            .expect("update");

        assert_eq!(updated, None);
        let listing = repo
            .list(&owner, &TaskQuery::default())
            .await
            .expect("list");
        assert_eq!(listing.first().map(|t| t.name.as_str()), Some("water plants"));
    }

    #[tokio::test]
    async fn update_with_a_cleared_due_date_removes_it() {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::random();
        let mut seed = new_task(&owner, &ProjectId::random(), "file taxes");
        seed.due_date = Some(Utc.with_ymd_and_hms(2025, 4, 15, 12, 0, 0).single().expect("ts"));
        let task = repo.insert(&seed).await.expect("insert");

        let changes = TaskChanges {
            due_date: Some(None),
            ..TaskChanges::default()
        };
        let updated = repo
            .update(&owner, &task.id, &changes)
            .await
            .expect("update")
            .expect("owned row");

        assert_eq!(updated.due_date, None);
    }

    #[tokio::test]
    async fn delete_returns_none_for_a_missing_row() {
        let repo = InMemoryTaskRepository::new();
        let removed = repo
            .delete(&UserId::random(), &TaskId::random())
            .await
            .expect("delete");
        assert_eq!(removed, None);
    }

    #[rstest]
    #[case::completed_only(Some(true), 1)]
    #[case::pending_only(Some(false), 1)]
    #[case::all(None, 2)]
    #[tokio::test]
    async fn list_filters_by_completion(#[case] completed: Option<bool>, #[case] expected: usize) {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::random();
        let project = ProjectId::random();
        let done = repo
            .insert(&new_task(&owner, &project, "done"))
            .await
            .expect("insert");
        repo.insert(&new_task(&owner, &project, "open"))
            .await
            .expect("insert");
        let changes = TaskChanges {
            is_completed: Some(true),
            ..TaskChanges::default()
        };
        repo.update(&owner, &done.id, &changes).await.expect("update");

        let query = TaskQuery {
            completed,
            ..TaskQuery::default()
        };
        let listing = repo.list(&owner, &query).await.expect("list");

        assert_eq!(listing.len(), expected);
    }

    #[tokio::test]
    async fn list_orders_by_creation_time_ascending() {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::random();
        let project = ProjectId::random();
        let first = Task::builder(TaskId::random(), owner.clone(), project.clone())
            .name("first")
            .created_at(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).single().expect("ts"))
            .build();
        let second = Task::builder(TaskId::random(), owner.clone(), project.clone())
            .name("second")
            .created_at(Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).single().expect("ts"))
            .build();
        repo.seed_task(second);
        repo.seed_task(first);

        let listing = repo
            .list(&owner, &TaskQuery::default())
            .await
            .expect("list");

        let names: Vec<&str> = listing.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[tokio::test]
    async fn archived_project_filter_consults_the_project_row() {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::random();
        let active = Project::builder(ProjectId::random(), owner.clone())
            .name("active")
            .build();
        let archived = Project::builder(ProjectId::random(), owner.clone())
            .name("archived")
            .archived(true)
            .build();
        repo.seed_project(active.clone());
        repo.seed_project(archived.clone());
        repo.insert(&new_task(&owner, &active.id, "visible"))
            .await
            .expect("insert");
        repo.insert(&new_task(&owner, &archived.id, "hidden"))
            .await
            .expect("insert");

        let query = TaskQuery {
            project_archived: Some(false),
            ..TaskQuery::default()
        };
        let listing = repo.list(&owner, &query).await.expect("list");

        assert_eq!(listing.len(), 1);
        assert_eq!(listing.first().map(|t| t.name.as_str()), Some("visible"));
    }

    #[tokio::test]
    async fn find_with_project_joins_the_seeded_project() {
        let repo = InMemoryTaskRepository::new();
        let owner = UserId::random();
        let project = Project::builder(ProjectId::random(), owner.clone())
            .name("errands")
            .build();
        repo.seed_project(project.clone());
        let task = repo
            .insert(&new_task(&owner, &project.id, "post letter"))
            .await
            .expect("insert");

        let found = repo
            .find_with_project(&owner, &task.id)
            .await
            .expect("find")
            .expect("owned row");

        assert_eq!(found.task.id, task.id);
        assert_eq!(found.project.name, "errands");
    }
}
