//! Cookie-session access for the HTTP handlers.
//!
//! Handlers never touch the Actix session API directly; this wrapper gives
//! them three domain-shaped operations: persist a completed sign-in, read
//! the provider access token back, and purge the cookie on sign-out. The
//! cookie stores the user id alongside the token; the token is what the
//! identity service resolves, the id is kept for diagnostics.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::SignedInSession;
use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";

/// Domain-shaped view over the Actix cookie session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist a completed sign-in in the session cookie.
    pub fn persist_sign_in(&self, signed_in: &SignedInSession) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, signed_in.account.id.as_ref())
            .and_then(|()| self.0.insert(ACCESS_TOKEN_KEY, &signed_in.access_token))
            .map_err(|error| Error::internal(format!("session cookie write failed: {error}")))
    }

    /// Fetch the provider access token from the session, if present.
    pub fn access_token(&self) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(ACCESS_TOKEN_KEY)
            .map_err(|error| Error::internal(format!("session cookie read failed: {error}")))
    }

    /// Fetch the signed-in user id from the session, if present.
    ///
    /// A tampered value is treated as an absent session rather than an
    /// internal failure.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("session cookie read failed: {error}")))?
        else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(error = %error, "session cookie carries a malformed user id");
                Ok(None)
            }
        }
    }

    /// Remove every session entry and invalidate the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
