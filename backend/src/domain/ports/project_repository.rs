//! Driven port for project persistence.
//!
//! Access is owner-scoped like the task port: mutations that match no owned
//! row report `Ok(None)` instead of distinguishing missing rows from rows
//! owned by someone else.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::ids::{ProjectId, UserId};
use crate::domain::project::{
    NewProject, Project, ProjectChanges, ProjectFilter, ProjectStatus, ProjectWithTasks,
};
use crate::domain::task::Task;

define_port_error! {
    /// Failures surfaced by project persistence adapters.
    pub enum ProjectRepositoryError {
        /// Lost or unavailable backing connection.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Statement construction or execution failure.
        Query { message: String } => "project repository query failed: {message}",
    }
}

/// Driven port for project persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a new project and return the persisted row.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store rejects the insert.
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError>;

    /// Apply changes to one of the owner's projects.
    ///
    /// Returns the updated row, or `None` when no project with that id
    /// belongs to the owner. An empty change set returns the current row
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn update(
        &self,
        owner: &UserId,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Delete one of the owner's projects along with its tasks, returning
    /// the removed project row.
    ///
    /// Returns `None` when no project with that id belongs to the owner.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn delete(
        &self,
        owner: &UserId,
        id: &ProjectId,
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    /// List the owner's projects matching the filter, ordered by creation
    /// time ascending.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn list(
        &self,
        owner: &UserId,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Fetch one of the owner's projects together with its tasks, ordered by
    /// creation time ascending.
    ///
    /// Returns `None` when no project with that id belongs to the owner.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn find_with_tasks(
        &self,
        owner: &UserId,
        id: &ProjectId,
    ) -> Result<Option<ProjectWithTasks>, ProjectRepositoryError>;
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<crate::domain::ids::TaskId, Task>,
}

/// In-memory implementation backed by a mutex-guarded map.
///
/// Deleting a project removes its seeded tasks too, mirroring the cascade
/// the relational adapter gets from its schema.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    state: Mutex<InMemoryProjectState>,
}

impl InMemoryProjectRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a project row directly, bypassing [`ProjectRepository::insert`].
    pub fn seed_project(&self, project: Project) {
        let mut state = self.lock();
        state.projects.insert(project.id.clone(), project);
    }

    /// Seed a task row so detail fetches can include it.
    pub fn seed_task(&self, task: Task) {
        let mut state = self.lock();
        state.tasks.insert(task.id.clone(), task);
    }

    /// Number of stored projects, for persistence-count assertions.
    pub fn project_count(&self) -> usize {
        self.lock().projects.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryProjectState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let row = Project::builder(project.id.clone(), project.author_id.clone())
            .name(project.name.clone())
            .archived(project.is_archived);
        let row = match &project.description {
            Some(description) => row.description(description.clone()),
            None => row,
        };
        let row = row.build();
        let mut state = self.lock();
        state.projects.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut state = self.lock();
        let Some(project) = state.projects.get_mut(id) else {
            return Ok(None);
        };
        if project.author_id != *owner {
            return Ok(None);
        }
        if let Some(name) = &changes.name {
            project.name = name.clone();
        }
        if let Some(description) = &changes.description {
            project.description = description.clone();
        }
        if let Some(is_archived) = changes.is_archived {
            project.is_archived = is_archived;
        }
        Ok(Some(project.clone()))
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: &ProjectId,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut state = self.lock();
        let owned = state
            .projects
            .get(id)
            .is_some_and(|project| project.author_id == *owner);
        if !owned {
            return Ok(None);
        }
        state.tasks.retain(|_, task| task.project_id != *id);
        Ok(state.projects.remove(id))
    }

    async fn list(
        &self,
        owner: &UserId,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let state = self.lock();
        let mut rows: Vec<Project> = state
            .projects
            .values()
            .filter(|project| project.author_id == *owner)
            .filter(|project| {
                filter
                    .status
                    .is_none_or(|status| project.status() == status)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_ref().cmp(b.id.as_ref()))
        });
        Ok(rows)
    }

    async fn find_with_tasks(
        &self,
        owner: &UserId,
        id: &ProjectId,
    ) -> Result<Option<ProjectWithTasks>, ProjectRepositoryError> {
        let state = self.lock();
        let Some(project) = state.projects.get(id) else {
            return Ok(None);
        };
        if project.author_id != *owner {
            return Ok(None);
        }
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.project_id == *id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_ref().cmp(b.id.as_ref()))
        });
        Ok(Some(ProjectWithTasks {
            project: project.clone(),
            tasks,
        }))
    }
}
