//! Driving port for session resolution and the sign-in flow.
//!
//! Resolution is infallible: a missing, stale, or revoked token produces an
//! expired [`PrincipalContext`], never an error. Handlers pass
//! that context onwards and let each action report the expiry inside its
//! envelope.

use async_trait::async_trait;
use url::Url;

use super::identity_gateway::Provider;
use crate::domain::account::Account;
use crate::domain::error::Error;
use crate::domain::principal::PrincipalContext;

/// Session facts established by a completed sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedInSession {
    /// Bearer token to carry in the cookie session.
    pub access_token: String,
    /// The local account the identity signed in as.
    pub account: Account,
}

/// Driving port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the session's access token into a principal context.
    async fn resolve(&self, access_token: Option<String>) -> PrincipalContext;

    /// Build the provider redirect that starts a sign-in attempt.
    ///
    /// # Errors
    ///
    /// Returns an error when the redirect cannot be built.
    async fn begin_sign_in(&self, provider: Provider, redirect_to: &str) -> Result<Url, Error>;

    /// Exchange the provider callback code and establish the local account.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized error for codes the provider refuses and an
    /// internal error for infrastructure failures.
    async fn complete_sign_in(&self, code: &str) -> Result<SignedInSession, Error>;

    /// Revoke the provider session behind the token.
    ///
    /// Revocation failures are logged and swallowed; the cookie session is
    /// discarded either way.
    async fn sign_out(&self, access_token: &str);
}
