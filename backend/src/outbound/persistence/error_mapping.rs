//! Error mapping shared by the Diesel repositories.
//!
//! Every repository error enum carries the same connection/query split, so
//! the classification lives here and each adapter supplies its own
//! constructors.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through the repository's connection constructor.
pub(super) fn pool_error_into<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let (PoolError::Checkout(message) | PoolError::Build(message)) = error;
    connection(message)
}

/// Classify a Diesel failure through the repository's constructors.
///
/// Reads go through `.optional()`, so `NotFound` reaching this function
/// means a read-back raced with a delete; callers see it as a query
/// failure. The messages only ever reach logs.
pub(super) fn diesel_error_into<E>(
    error: diesel::result::Error,
    query: impl Fn(&'static str) -> E,
    connection: impl Fn(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "database statement failed");
    } else {
        debug!(error = %error, "database statement failed");
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("connection lost")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("foreign key violation")
        }
        DieselError::NotFound => query("row not found"),
        DieselError::QueryBuilderError(_) => query("query construction failed"),
        _ => query("statement failed"),
    }
}
