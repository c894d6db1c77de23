//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Locally persisted user accounts.
    ///
    /// The primary key is the provider-issued user id; profile fields are
    /// refreshed from the provider on each sign-in.
    users (id) {
        /// Primary key: provider-issued UUID.
        id -> Uuid,
        /// Email address on record.
        email -> Varchar,
        /// Name shown in the account header.
        display_name -> Varchar,
        /// IANA time zone identifier, e.g. `Europe/London`.
        time_zone -> Varchar,
        /// First sign-in timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Projects grouping a user's tasks.
    projects (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        author_id -> Uuid,
        /// Project name (max 120 characters).
        name -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Archival flag; archived projects drop out of default listings.
        is_archived -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks, each owned by a user and attached to one project.
    tasks (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        author_id -> Uuid,
        /// Owning project; pairs with `author_id` in a composite foreign
        /// key so a task can never reference another user's project.
        project_id -> Uuid,
        /// Task name (max 120 characters).
        name -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Optional due instant, stored in UTC.
        due_date -> Nullable<Timestamptz>,
        /// Completion flag.
        is_completed -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(projects -> users (author_id));
diesel::joinable!(tasks -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(users, projects, tasks);
