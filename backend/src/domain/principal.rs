//! Acting principal and per-request resolution context.
//!
//! Operations never consult ambient session state. The inbound adapter
//! resolves the caller once per request and passes the outcome into every
//! operation as a [`PrincipalContext`]. Validation runs before the context
//! is consulted, so input errors surface even when the session is gone.

use std::fmt;

use crate::domain::outcome::ActionResult;
use crate::domain::{TimeZone, UserId};

/// Actionable message returned when session resolution fails.
///
/// Shown to users verbatim, unlike internal faults which are masked.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Session resolution failure.
///
/// Covers every way of not having a usable session: no cookie, a revoked
/// token, or the provider no longer recognising it. Callers cannot tell the
/// difference and the remedy is the same, so neither does this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionExpired;

impl fmt::Display for SessionExpired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SESSION_EXPIRED_MESSAGE)
    }
}

impl std::error::Error for SessionExpired {}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    email: String,
    display_name: String,
    time_zone: TimeZone,
}

impl Principal {
    /// Assemble a principal from resolved identity fields.
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        time_zone: TimeZone,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            display_name: display_name.into(),
            time_zone,
        }
    }

    /// Stable identifier scoping every repository access.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Email address on record with the identity provider.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Name shown in the account header.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Zone used to anchor calendar-day due filters.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }
}

/// Per-request principal resolution outcome.
///
/// Built once by the inbound adapter and handed to each operation the
/// request performs. Holding the failed case too keeps the ordering
/// contract honest: operations validate input first, then consult the
/// context.
#[derive(Debug, Clone)]
pub struct PrincipalContext {
    resolution: Result<Principal, SessionExpired>,
}

impl PrincipalContext {
    /// Context for a successfully resolved caller.
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            resolution: Ok(principal),
        }
    }

    /// Context for a request whose session could not be resolved.
    pub fn expired() -> Self {
        Self {
            resolution: Err(SessionExpired),
        }
    }

    /// The resolved principal, or the expiry carried by this request.
    pub fn principal(&self) -> Result<&Principal, SessionExpired> {
        self.resolution.as_ref().map_err(|expired| *expired)
    }

    /// The resolved principal, with expiry packaged as a failed action.
    ///
    /// Services call this after validating input, turning a dead session
    /// into the verbatim expiry message inside the envelope.
    pub fn principal_or_failure<T>(&self) -> Result<&Principal, ActionResult<T>> {
        self.principal()
            .map_err(|expired| ActionResult::failure_message(expired.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn principal() -> Principal {
        Principal::new(
            UserId::random(),
            "ada@example.com",
            "Ada",
            TimeZone::utc(),
        )
    }

    #[rstest]
    fn expired_message_is_actionable_and_verbatim() {
        assert_eq!(
            SessionExpired.to_string(),
            "Your session has expired. Please sign in again."
        );
    }

    #[rstest]
    fn authenticated_context_yields_the_principal() {
        let principal = principal();
        let ctx = PrincipalContext::authenticated(principal.clone());
        assert_eq!(ctx.principal(), Ok(&principal));
    }

    #[rstest]
    fn expired_context_yields_the_failure() {
        let ctx = PrincipalContext::expired();
        assert_eq!(ctx.principal(), Err(SessionExpired));
    }

    #[rstest]
    fn expired_context_packages_the_verbatim_message_for_actions() {
        let ctx = PrincipalContext::expired();
        let failure = ctx.principal_or_failure::<()>().expect_err("expired");
        assert_eq!(
            failure.errors().first().map(|e| e.message()),
            Some(SESSION_EXPIRED_MESSAGE)
        );
    }
}
