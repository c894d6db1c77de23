//! Driving port for account settings actions.

use async_trait::async_trait;

use crate::domain::account::Profile;
use crate::domain::input::SubmissionInput;
use crate::domain::outcome::ActionResult;
use crate::domain::principal::PrincipalContext;

/// Driving port for account operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountActions: Send + Sync {
    /// The caller's profile as shown on the settings screen.
    async fn profile(&self, ctx: &PrincipalContext) -> ActionResult<Profile>;

    /// Validate a time zone submission and store it on the account.
    async fn update_time_zone(
        &self,
        ctx: &PrincipalContext,
        input: &SubmissionInput,
    ) -> ActionResult<Profile>;

    /// Delete the caller's account along with its projects and tasks.
    ///
    /// Provider sign-out and cookie teardown stay with the inbound adapter.
    async fn delete_account(&self, ctx: &PrincipalContext) -> ActionResult<()>;
}
