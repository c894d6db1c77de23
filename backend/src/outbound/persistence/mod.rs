//! PostgreSQL persistence adapters built on Diesel.
//!
//! Concrete implementations of the domain repository ports, talking to
//! PostgreSQL through `diesel-async` over a `bb8` connection pool.
//!
//! Ground rules for this layer:
//!
//! - Repositories only translate between Diesel row types and domain
//!   aggregates; no business rules live here.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module and never leak into the domain.
//! - Database faults surface as the repository error types the ports
//!   declare, never as raw Diesel errors.
//! - Every statement over user data filters on the owning user's id, so
//!   one user's rows are invisible to another's queries at the lowest
//!   layer.
//!
//! # Example
//!
//! ```ignore
//! use daylist_backend::outbound::persistence::{DbPool, PoolConfig, DieselTaskRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/daylist");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselTaskRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_project_repository;
mod diesel_task_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_task_repository::DieselTaskRepository;
pub use pool::{DbConnection, DbPool, PoolConfig, PoolError};
