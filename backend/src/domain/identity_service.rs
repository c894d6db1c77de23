//! Identity domain service.
//!
//! Implements the [`IdentityResolver`] driving port over the identity
//! gateway and the account repository. The provider owns credentials; this
//! service keeps the local account row in step with what the provider
//! vouches for and turns token state into a [`PrincipalContext`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};
use url::Url;

use crate::domain::error::Error;
use crate::domain::ports::{
    AccountRepository, IdentityGateway, IdentityGatewayError, IdentityResolver, Provider,
    SignedInSession,
};
use crate::domain::principal::PrincipalContext;

/// Identity service implementing the driving port.
#[derive(Clone)]
pub struct IdentityService<G, A> {
    gateway: Arc<G>,
    accounts: Arc<A>,
}

impl<G, A> IdentityService<G, A> {
    /// Create a new service over the given ports.
    pub fn new(gateway: Arc<G>, accounts: Arc<A>) -> Self {
        Self { gateway, accounts }
    }
}

#[async_trait]
impl<G, A> IdentityResolver for IdentityService<G, A>
where
    G: IdentityGateway,
    A: AccountRepository,
{
    async fn resolve(&self, access_token: Option<String>) -> PrincipalContext {
        let Some(token) = access_token else {
            return PrincipalContext::expired();
        };

        let identity = match self.gateway.identity(&token).await {
            Ok(identity) => identity,
            Err(IdentityGatewayError::Expired) => {
                debug!("session token no longer recognised by the provider");
                return PrincipalContext::expired();
            }
            Err(err) => {
                error!(error = %err, "identity lookup failed, treating session as expired");
                return PrincipalContext::expired();
            }
        };

        match self.accounts.find(&identity.id).await {
            Ok(Some(account)) => PrincipalContext::authenticated(account.principal()),
            Ok(None) => {
                // No local row for a live token; create one from the
                // brokered identity.
                match self.accounts.upsert(&identity).await {
                    Ok(account) => PrincipalContext::authenticated(account.principal()),
                    Err(err) => {
                        error!(error = %err, "account row recreation failed");
                        PrincipalContext::expired()
                    }
                }
            }
            Err(err) => {
                error!(error = %err, "account lookup failed, treating session as expired");
                PrincipalContext::expired()
            }
        }
    }

    async fn begin_sign_in(&self, provider: Provider, redirect_to: &str) -> Result<Url, Error> {
        self.gateway
            .authorize_url(provider, redirect_to)
            .map_err(|err| Error::internal(format!("authorise URL construction failed: {err}")))
    }

    async fn complete_sign_in(&self, code: &str) -> Result<SignedInSession, Error> {
        let session = match self.gateway.exchange_code(code).await {
            Ok(session) => session,
            Err(IdentityGatewayError::Denied { message }) => {
                debug!(%message, "provider refused the grant code");
                return Err(Error::unauthorized("sign-in code was not accepted"));
            }
            Err(err) => {
                error!(error = %err, "grant code exchange failed");
                return Err(Error::internal(format!("code exchange failed: {err}")));
            }
        };

        let account = self
            .accounts
            .upsert(&session.identity)
            .await
            .map_err(|err| Error::internal(format!("account upsert failed: {err}")))?;

        Ok(SignedInSession {
            access_token: session.access_token,
            account,
        })
    }

    async fn sign_out(&self, access_token: &str) {
        if let Err(err) = self.gateway.revoke(access_token).await {
            warn!(error = %err, "provider session revocation failed");
        }
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
