//! Task aggregate, filters, and operation schemas.
//!
//! Tasks belong to exactly one project and one author. Every repository
//! access is scoped by the author id, so one user's tasks are invisible to
//! another's queries by construction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{ProjectId, TaskId, UserId};
use crate::domain::project::{Project, ProjectStatus};
use crate::domain::schema::{FieldKind, FieldRule, Presence, Schema, TEXT_MAX};
use crate::domain::time_zone::DayWindow;

/// Form field names shared by the task schemas and their handlers.
pub mod fields {
    /// Task name.
    pub const NAME: &str = "name";
    /// Optional free-text description.
    pub const DESCRIPTION: &str = "description";
    /// Owning project identifier.
    pub const PROJECT: &str = "projectId";
    /// Optional due date.
    pub const DUE_DATE: &str = "dueDate";
    /// Completion flag.
    pub const COMPLETED: &str = "isCompleted";
    /// Task identifier, for update and delete submissions.
    pub const ID: &str = "id";
}

/// Message for a missing or blank task name.
pub const NAME_REQUIRED: &str = "The task name is required.";
/// Message for an over-long task name.
pub const NAME_TOO_LONG: &str = "The task name must be 500 characters long or shorter.";
/// Message for an over-long task description.
pub const DESCRIPTION_TOO_LONG: &str =
    "The task description must be 500 characters long or shorter.";
/// Message for a missing project reference on creation.
pub const PROJECT_REQUIRED: &str = "The project is required.";
/// Message for an unparseable project reference.
pub const PROJECT_INVALID: &str = "Invalid project ID.";
/// Message for an unparseable due date.
pub const DUE_DATE_INVALID: &str = "Invalid due date.";
/// Message for an unparseable completion flag.
pub const COMPLETED_INVALID: &str = "Invalid completed flag.";
/// Message for an update submission without a task id.
pub const UPDATE_ID_REQUIRED: &str = "Cannot update a task without its id.";
/// Message for a delete submission without a task id.
pub const DELETE_ID_REQUIRED: &str = "Cannot delete a task without its id.";
/// Message for an unparseable task id.
pub const ID_INVALID: &str = "Invalid task ID.";

/// Constraints for creating a task.
pub static CREATE_TASK: Schema = Schema {
    operation: "create_task",
    rules: &[
        FieldRule {
            name: fields::NAME,
            presence: Presence::Required {
                missing: NAME_REQUIRED,
            },
            kind: FieldKind::Text {
                max: TEXT_MAX,
                too_long: NAME_TOO_LONG,
            },
        },
        FieldRule {
            name: fields::DESCRIPTION,
            presence: Presence::Optional,
            kind: FieldKind::Text {
                max: TEXT_MAX,
                too_long: DESCRIPTION_TOO_LONG,
            },
        },
        FieldRule {
            name: fields::PROJECT,
            presence: Presence::Required {
                missing: PROJECT_REQUIRED,
            },
            kind: FieldKind::Id {
                invalid: PROJECT_INVALID,
            },
        },
        FieldRule {
            name: fields::DUE_DATE,
            presence: Presence::Optional,
            kind: FieldKind::Date {
                invalid: DUE_DATE_INVALID,
            },
        },
    ],
};

/// Constraints for updating a task.
///
/// Only the id is mandatory; any other field left out of the submission
/// keeps its stored value, so a single-field form (the completion checkbox,
/// say) round-trips without touching the rest of the task.
pub static UPDATE_TASK: Schema = Schema {
    operation: "update_task",
    rules: &[
        FieldRule {
            name: fields::ID,
            presence: Presence::Required {
                missing: UPDATE_ID_REQUIRED,
            },
            kind: FieldKind::Id {
                invalid: ID_INVALID,
            },
        },
        FieldRule {
            name: fields::NAME,
            presence: Presence::Optional,
            kind: FieldKind::Text {
                max: TEXT_MAX,
                too_long: NAME_TOO_LONG,
            },
        },
        FieldRule {
            name: fields::DESCRIPTION,
            presence: Presence::Optional,
            kind: FieldKind::Text {
                max: TEXT_MAX,
                too_long: DESCRIPTION_TOO_LONG,
            },
        },
        FieldRule {
            name: fields::PROJECT,
            presence: Presence::Optional,
            kind: FieldKind::Id {
                invalid: PROJECT_INVALID,
            },
        },
        FieldRule {
            name: fields::DUE_DATE,
            presence: Presence::Optional,
            kind: FieldKind::Date {
                invalid: DUE_DATE_INVALID,
            },
        },
        FieldRule {
            name: fields::COMPLETED,
            presence: Presence::Optional,
            kind: FieldKind::Flag {
                invalid: COMPLETED_INVALID,
            },
        },
    ],
};

/// Constraints for deleting a task.
pub static DELETE_TASK: Schema = Schema {
    operation: "delete_task",
    rules: &[FieldRule {
        name: fields::ID,
        presence: Presence::Required {
            missing: DELETE_ID_REQUIRED,
        },
        kind: FieldKind::Id {
            invalid: ID_INVALID,
        },
    }],
};

/// Completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet completed.
    #[default]
    Pending,
    /// Marked done.
    Completed,
}

impl TaskStatus {
    /// Returns the wire and database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown task status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTaskStatusError {
    /// The unrecognised input value.
    pub input: String,
}

impl std::fmt::Display for ParseTaskStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown task status: {}", self.input)
    }
}

impl std::error::Error for ParseTaskStatusError {}

impl std::str::FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError {
                input: s.to_owned(),
            }),
        }
    }
}

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Task {
    /// Stable identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: TaskId,
    /// Owning user.
    #[schema(value_type = String, format = Uuid)]
    pub author_id: UserId,
    /// Project the task belongs to.
    #[schema(value_type = String, format = Uuid)]
    pub project_id: ProjectId,
    /// Short description of the work.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Optional due instant, stored in UTC.
    pub due_date: Option<DateTime<Utc>>,
    /// Whether the task has been marked done.
    pub is_completed: bool,
    /// Creation timestamp; listings order by this ascending.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a builder for constructing tasks incrementally.
    pub fn builder(id: TaskId, author_id: UserId, project_id: ProjectId) -> TaskBuilder {
        TaskBuilder::new(id, author_id, project_id)
    }

    /// Completion state derived from the stored flag.
    pub fn status(&self) -> TaskStatus {
        if self.is_completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }
}

/// Builder for constructing [`Task`] values incrementally.
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    id: TaskId,
    author_id: UserId,
    project_id: ProjectId,
    name: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    is_completed: bool,
    created_at: Option<DateTime<Utc>>,
}

impl TaskBuilder {
    /// Create a new builder for the given identifiers.
    pub fn new(id: TaskId, author_id: UserId, project_id: ProjectId) -> Self {
        Self {
            id,
            author_id,
            project_id,
            name: String::new(),
            description: None,
            due_date: None,
            is_completed: false,
            created_at: None,
        }
    }

    /// Set the task name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the due instant.
    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the completion flag.
    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Build the final [`Task`] instance.
    pub fn build(self) -> Task {
        Task {
            id: self.id,
            author_id: self.author_id,
            project_id: self.project_id,
            name: self.name,
            description: self.description,
            due_date: self.due_date,
            is_completed: self.is_completed,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Validated data for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Server-minted identifier.
    pub id: TaskId,
    /// Owning user.
    pub author_id: UserId,
    /// Project the task belongs to.
    pub project_id: ProjectId,
    /// Task name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional due instant in UTC.
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update for a task.
///
/// `None` leaves the stored value unchanged. The doubly-optional fields
/// distinguish "unchanged" from "clear the stored value": `Some(None)`
/// clears, matching a blank submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskChanges {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement or cleared description.
    pub description: Option<Option<String>>,
    /// Move the task to another project.
    pub project_id: Option<ProjectId>,
    /// Replacement or cleared due instant.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Replacement completion flag.
    pub is_completed: Option<bool>,
}

impl TaskChanges {
    /// Whether the update would touch nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.project_id.is_none()
            && self.due_date.is_none()
            && self.is_completed.is_none()
    }
}

/// Due-date constraint for task listings, on calendar days in the user's
/// zone.
///
/// Holding a single optional value makes the old "both bounds at once"
/// contract violation impossible to express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    /// Tasks due on or before the end of the given day.
    By(NaiveDate),
    /// Tasks due within the given day.
    On(NaiveDate),
}

/// User-facing task listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to one project.
    pub project: Option<ProjectId>,
    /// Restrict by due date.
    pub due: Option<DueFilter>,
    /// Restrict by completion state.
    pub status: Option<TaskStatus>,
    /// Restrict by the owning project's archival state.
    pub project_status: Option<ProjectStatus>,
}

/// Repository-level task query with due bounds resolved to UTC instants.
///
/// Built by the service from a [`TaskFilter`] and the principal's time
/// zone; repositories never see calendar days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Restrict to one project.
    pub project: Option<ProjectId>,
    /// Keep tasks due at or before this instant.
    pub due_before: Option<DateTime<Utc>>,
    /// Keep tasks due within this window.
    pub due_within: Option<DayWindow>,
    /// Keep tasks with this completion flag.
    pub completed: Option<bool>,
    /// Keep tasks whose project has this archival flag.
    pub project_archived: Option<bool>,
}

/// A task joined with its owning project, for the task detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithProject {
    /// The task itself.
    pub task: Task,
    /// Its owning project.
    pub project: Project,
}
