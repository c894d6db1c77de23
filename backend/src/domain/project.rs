//! Project aggregate, filters, and operation schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{ProjectId, UserId};
use crate::domain::schema::{FieldKind, FieldRule, Presence, Schema, TEXT_MAX};
use crate::domain::task::Task;

/// Form field names shared by the project schemas and their handlers.
pub mod fields {
    /// Project name.
    pub const NAME: &str = "name";
    /// Optional free-text description.
    pub const DESCRIPTION: &str = "description";
    /// Archival flag.
    pub const ARCHIVED: &str = "isArchived";
    /// Project identifier, for update and delete submissions.
    pub const ID: &str = "id";
}

/// Message for a missing or blank project name.
pub const NAME_REQUIRED: &str = "The project name is required.";
/// Message for an over-long project name.
pub const NAME_TOO_LONG: &str = "The project name must be 500 characters long or shorter.";
/// Message for an over-long project description.
pub const DESCRIPTION_TOO_LONG: &str =
    "The project description must be 500 characters long or shorter.";
/// Message for an unparseable archival flag.
pub const ARCHIVED_INVALID: &str = "Invalid archived flag.";
/// Message for an update submission without a project id.
pub const UPDATE_ID_REQUIRED: &str = "Cannot update a project without its id.";
/// Message for a delete submission without a project id.
pub const DELETE_ID_REQUIRED: &str = "Cannot delete a project without its id.";
/// Message for an unparseable project id.
pub const ID_INVALID: &str = "Invalid project ID.";

/// Constraints for creating a project.
pub static CREATE_PROJECT: Schema = Schema {
    operation: "create_project",
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
            name: fields::ARCHIVED,
            presence: Presence::Optional,
            kind: FieldKind::Flag {
                invalid: ARCHIVED_INVALID,
            },
        },
    ],
};

/// Constraints for updating a project.
///
/// Only the id is mandatory; omitted fields keep their stored values.
pub static UPDATE_PROJECT: Schema = Schema {
    operation: "update_project",
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
            name: fields::ARCHIVED,
            presence: Presence::Optional,
            kind: FieldKind::Flag {
                invalid: ARCHIVED_INVALID,
            },
        },
    ],
};

/// Constraints for deleting a project.
pub static DELETE_PROJECT: Schema = Schema {
    operation: "delete_project",
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

/// Archival state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Shown in the active project list.
    #[default]
    Active,
    /// Hidden from the active list but kept with its tasks.
    Archived,
}

impl ProjectStatus {
    /// Returns the wire and database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown project status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProjectStatusError {
    /// The unrecognised input value.
    pub input: String,
}

impl std::fmt::Display for ParseProjectStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown project status: {}", self.input)
    }
}

impl std::error::Error for ParseProjectStatusError {}

impl std::str::FromStr for ProjectStatus {
    type Err = ParseProjectStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseProjectStatusError {
                input: s.to_owned(),
            }),
        }
    }
}

/// A persisted project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Stable identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: ProjectId,
    /// Owning user.
    #[schema(value_type = String, format = Uuid)]
    pub author_id: UserId,
    /// Project name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Whether the project is archived.
    pub is_archived: bool,
    /// Creation timestamp; listings order by this ascending.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Create a builder for constructing projects incrementally.
    pub fn builder(id: ProjectId, author_id: UserId) -> ProjectBuilder {
        ProjectBuilder::new(id, author_id)
    }

    /// Archival state derived from the stored flag.
    pub fn status(&self) -> ProjectStatus {
        if self.is_archived {
            ProjectStatus::Archived
        } else {
            ProjectStatus::Active
        }
    }
}

/// Builder for constructing [`Project`] values incrementally.
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    id: ProjectId,
    author_id: UserId,
    name: String,
    description: Option<String>,
    is_archived: bool,
    created_at: Option<DateTime<Utc>>,
}

impl ProjectBuilder {
    /// Create a new builder for the given identifiers.
    pub fn new(id: ProjectId, author_id: UserId) -> Self {
        Self {
            id,
            author_id,
            name: String::new(),
            description: None,
            is_archived: false,
            created_at: None,
        }
    }

    /// Set the project name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the archival flag.
    pub fn archived(mut self, is_archived: bool) -> Self {
        self.is_archived = is_archived;
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Build the final [`Project`] instance.
    pub fn build(self) -> Project {
        Project {
            id: self.id,
            author_id: self.author_id,
            name: self.name,
            description: self.description,
            is_archived: self.is_archived,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Validated data for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Server-minted identifier.
    pub id: ProjectId,
    /// Owning user.
    pub author_id: UserId,
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial archival flag.
    pub is_archived: bool,
}

/// Partial update for a project.
///
/// `None` leaves the stored value unchanged; `Some(None)` clears an
/// optional value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectChanges {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement or cleared description.
    pub description: Option<Option<String>>,
    /// Replacement archival flag.
    pub is_archived: Option<bool>,
}

impl ProjectChanges {
    /// Whether the update would touch nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_archived.is_none()
    }
}

/// Project listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    /// Restrict by archival state.
    pub status: Option<ProjectStatus>,
}

/// A project joined with its tasks, for the project detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithTasks {
    /// The project itself.
    pub project: Project,
    /// Its tasks, ordered by creation time ascending.
    pub tasks: Vec<Task>,
}
