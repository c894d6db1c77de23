//! Driven port for locally persisted user accounts.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::define_port_error;
use super::identity_gateway::BrokeredIdentity;
use crate::domain::account::Account;
use crate::domain::ids::UserId;
use crate::domain::time_zone::TimeZone;

define_port_error! {
    /// Failures surfaced by account persistence adapters.
    pub enum AccountRepositoryError {
        /// Lost or unavailable backing connection.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Statement construction or execution failure.
        Query { message: String } => "account repository query failed: {message}",
    }
}

/// Driven port for account persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn find(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Create or refresh the account row for a brokered identity.
    ///
    /// First sign-in creates the row with the UTC time zone. Later sign-ins
    /// refresh the email and display name from the provider but keep the
    /// stored time zone and creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn upsert(&self, identity: &BrokeredIdentity)
    -> Result<Account, AccountRepositoryError>;

    /// Replace the account's time zone.
    ///
    /// Returns the updated row, or `None` when no account with that id
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn set_time_zone(
        &self,
        id: &UserId,
        zone: &TimeZone,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Delete the account and everything that hangs off it.
    ///
    /// Returns the removed row, or `None` when no account with that id
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    async fn delete(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError>;
}

/// In-memory implementation backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<UserId, Account>>,
}

impl InMemoryAccountRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account row directly.
    pub fn seed(&self, account: Account) {
        let mut accounts = self.lock();
        accounts.insert(account.id.clone(), account);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.lock().get(id).cloned())
    }

    async fn upsert(
        &self,
        identity: &BrokeredIdentity,
    ) -> Result<Account, AccountRepositoryError> {
        let mut accounts = self.lock();
        let account = match accounts.get_mut(&identity.id) {
            Some(existing) => {
                existing.email = identity.email.clone();
                existing.display_name = identity.display_name.clone();
                existing.clone()
            }
            None => {
                let created = Account {
                    id: identity.id.clone(),
                    email: identity.email.clone(),
                    display_name: identity.display_name.clone(),
                    time_zone: TimeZone::utc(),
                    created_at: chrono::Utc::now(),
                };
                accounts.insert(identity.id.clone(), created.clone());
                created
            }
        };
        Ok(account)
    }

    async fn set_time_zone(
        &self,
        id: &UserId,
        zone: &TimeZone,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut accounts = self.lock();
        let Some(account) = accounts.get_mut(id) else {
            return Ok(None);
        };
        account.time_zone = zone.clone();
        Ok(Some(account.clone()))
    }

    async fn delete(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(self.lock().remove(id))
    }
}
