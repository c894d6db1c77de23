//! Account domain service.
//!
//! Implements the [`AccountActions`] driving port over the account
//! repository. Account operations never publish refresh hints; nothing they
//! change feeds the task or project listings.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::account::{Profile, UPDATE_TIME_ZONE, fields};
use crate::domain::input::SubmissionInput;
use crate::domain::outcome::ActionResult;
use crate::domain::ports::{AccountActions, AccountRepository};
use crate::domain::principal::PrincipalContext;

/// Account service implementing the driving port.
#[derive(Clone)]
pub struct AccountService<A> {
    accounts: Arc<A>,
}

impl<A> AccountService<A> {
    /// Create a new service over the account repository.
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl<A> AccountActions for AccountService<A>
where
    A: AccountRepository,
{
    async fn profile(&self, ctx: &PrincipalContext) -> ActionResult<Profile> {
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        match self.accounts.find(principal.user_id()).await {
            Ok(Some(account)) => ActionResult::success(Profile::from(&account)),
            Ok(None) => {
                debug!(user_id = %principal.user_id(), "profile read found no account row");
                ActionResult::masked_internal()
            }
            Err(err) => {
                error!(error = %err, "profile read failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn update_time_zone(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Profile> {
        let validated = match UPDATE_TIME_ZONE.evaluate(input) {
            Ok(validated) => validated,
            Err(errors) => return ActionResult::failure(errors),
        };
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        let Some(zone) = validated.zone(fields::TIME_ZONE) else {
            error!(
                operation = UPDATE_TIME_ZONE.operation,
                "required fields absent after validation"
            );
            return ActionResult::masked_internal();
        };

        match self
            .accounts
            .set_time_zone(principal.user_id(), &zone)
            .await
        {
            Ok(Some(account)) => ActionResult::success(Profile::from(&account)),
            Ok(None) => {
                debug!(user_id = %principal.user_id(), "time zone update found no account row");
                ActionResult::masked_internal()
            }
            Err(err) => {
                error!(error = %err, "time zone update failed");
                ActionResult::masked_internal()
            }
        }
    }

    async fn delete_account(&self, ctx: &PrincipalContext) -> ActionResult<()> {
        let principal = match ctx.principal_or_failure() {
            Ok(principal) => principal,
            Err(failure) => return failure,
        };
        match self.accounts.delete(principal.user_id()).await {
            Ok(Some(_)) => ActionResult::success(()),
            Ok(None) => {
                debug!(user_id = %principal.user_id(), "account deletion found no row");
                ActionResult::masked_internal()
            }
            Err(err) => {
                error!(error = %err, "account deletion failed");
                ActionResult::masked_internal()
            }
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
