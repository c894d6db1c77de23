//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Sign-in upserts land here: the first insert stores the UTC time zone,
//! and conflicting inserts refresh only the provider-owned profile columns.
//! Deleting an account leans on the cascading foreign keys to remove the
//! user's projects and tasks in the same statement.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::account::Account;
use crate::domain::ids::UserId;
use crate::domain::ports::{AccountRepository, AccountRepositoryError, BrokeredIdentity};
use crate::domain::time_zone::TimeZone;

use super::error_mapping::{diesel_error_into, pool_error_into};
use super::models::{AccountProfileUpdate, AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Pool checkout failures surface as connection errors.
fn checkout_error(error: PoolError) -> AccountRepositoryError {
    pool_error_into(error, AccountRepositoryError::connection)
}

/// Translate Diesel failures into the repository's error space.
fn statement_error(error: diesel::result::Error) -> AccountRepositoryError {
    diesel_error_into(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

/// Convert a database row to a domain account.
///
/// A stored zone the tz database no longer knows falls back to UTC rather
/// than failing the whole read.
fn row_to_account(row: AccountRow) -> Account {
    let time_zone = match TimeZone::new(&row.time_zone) {
        Ok(zone) => zone,
        Err(error) => {
            warn!(
                error = %error,
                account_id = %row.id,
                "stored time zone is unknown; falling back to UTC"
            );
            TimeZone::utc()
        }
    };
    Account {
        id: UserId::from_uuid(row.id),
        email: row.email,
        display_name: row.display_name,
        time_zone,
        created_at: row.created_at,
    }
}

/// Fetch an account row by id.
async fn find_row<C>(
    conn: &mut C,
    id: &UserId,
) -> Result<Option<AccountRow>, AccountRepositoryError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    users::table
        .filter(users::id.eq(id.as_uuid()))
        .select(AccountRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(statement_error)
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let row = find_row(&mut conn, id).await?;
        Ok(row.map(row_to_account))
    }

    async fn upsert(
        &self,
        identity: &BrokeredIdentity,
    ) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let initial_zone = TimeZone::utc();
        let new_row = NewAccountRow {
            id: *identity.id.as_uuid(),
            email: &identity.email,
            display_name: &identity.display_name,
            time_zone: initial_zone.as_ref(),
        };
        let refresh = AccountProfileUpdate {
            email: &identity.email,
            display_name: &identity.display_name,
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict(users::id)
            .do_update()
            .set(&refresh)
            .execute(&mut conn)
            .await
            .map_err(statement_error)?;

        let row = find_row(&mut conn, &identity.id)
            .await?
            .ok_or_else(|| AccountRepositoryError::query("upserted account row missing"))?;
        Ok(row_to_account(row))
    }

    async fn set_time_zone(
        &self,
        id: &UserId,
        zone: &TimeZone,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let affected = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(users::time_zone.eq(zone.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(statement_error)?;

        if affected == 0 {
            return Ok(None);
        }

        let row = find_row(&mut conn, id).await?;
        Ok(row.map(row_to_account))
    }

    async fn delete(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;

        let Some(row) = find_row(&mut conn, id).await? else {
            return Ok(None);
        };

        let removed = diesel::delete(users::table.filter(users::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(statement_error)?;

        if removed == 0 {
            return Ok(None);
        }
        Ok(Some(row_to_account(row)))
    }
}
