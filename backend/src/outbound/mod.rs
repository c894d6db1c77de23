//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Concrete implementations of the domain port traits:
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel
//! - **identity**: HTTP client for the hosted identity broker
//! - **refresh**: in-process broadcast hub behind the refresh publisher port
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod identity;
pub mod persistence;
pub mod refresh;
