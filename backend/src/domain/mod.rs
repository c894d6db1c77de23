//! Domain types, validation schemas, and services.
//!
//! Purpose: Define the strongly typed core of the application: aggregates,
//! submission validation, the action result envelope, and the services that
//! implement the driving ports. Transport and storage concerns stay in the
//! inbound and outbound adapters; everything here is framework free.
//!
//! Public surface (by concern):
//! - Identity: [`Principal`], [`PrincipalContext`], [`SessionExpired`] and
//!   the verbatim [`SESSION_EXPIRED_MESSAGE`].
//! - Input: [`SubmissionInput`] (raw form pairs), `schema` (per-operation
//!   field tables) and its [`ValidatedInput`].
//! - Outcome: [`ActionResult`], [`FieldError`], and
//!   [`GENERIC_INTERNAL_MESSAGE`] for masked internal failures.
//! - Aggregates: `task`, `project`, and `account` types with their field
//!   name and message constants.
//! - Services: [`TaskService`], [`ProjectService`], [`AccountService`], and
//!   [`IdentityService`] implementing the driving ports in [`ports`].
//! - Errors: [`Error`] and [`ErrorCode`] for surfaces outside the envelope.

pub mod account;
pub mod account_service;
pub mod error;
pub mod identity_service;
pub mod ids;
pub mod input;
pub mod outcome;
pub mod ports;
pub mod principal;
pub mod project;
pub mod project_service;
pub mod schema;
pub mod task;
pub mod task_service;
pub mod time_zone;

pub use self::account::{Account, Profile};
pub use self::account_service::AccountService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::IdentityService;
pub use self::ids::{IdError, ProjectId, TaskId, UserId};
pub use self::input::SubmissionInput;
pub use self::outcome::{ActionResult, FieldError, GENERIC_INTERNAL_MESSAGE};
pub use self::principal::{
    Principal, PrincipalContext, SESSION_EXPIRED_MESSAGE, SessionExpired,
};
pub use self::project::{
    NewProject, Project, ProjectChanges, ProjectFilter, ProjectStatus, ProjectWithTasks,
};
pub use self::project_service::ProjectService;
pub use self::schema::{Schema, ValidatedInput};
pub use self::task::{
    DueFilter, NewTask, Task, TaskChanges, TaskFilter, TaskQuery, TaskStatus, TaskWithProject,
};
pub use self::task_service::TaskService;
pub use self::time_zone::{DayWindow, TimeZone, TimeZoneError};
