//! Driven port for the hosted identity service.
//!
//! Sign-in is brokered: the browser is redirected to the provider, the
//! provider calls back with a grant code, and the gateway exchanges that
//! code for an access token. The domain only ever sees the trait below, so
//! services and handlers stay testable without network access.

use async_trait::async_trait;
use url::Url;

use super::define_port_error;
use crate::domain::ids::UserId;

/// OAuth provider selectable on the sign-in screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Sign in with Facebook.
    Facebook,
    /// Sign in with GitHub.
    Github,
    /// Sign in with Google.
    Google,
    /// Sign in with LinkedIn.
    Linkedin,
    /// Sign in with Twitter.
    Twitter,
}

impl Provider {
    /// Returns the wire representation used in authorisation URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Github => "github",
            Self::Google => "google",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown provider string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProviderError {
    /// The unrecognised input value.
    pub input: String,
}

impl std::fmt::Display for ParseProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown sign-in provider: {}", self.input)
    }
}

impl std::error::Error for ParseProviderError {}

impl std::str::FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facebook" => Ok(Self::Facebook),
            "github" => Ok(Self::Github),
            "google" => Ok(Self::Google),
            "linkedin" => Ok(Self::Linkedin),
            "twitter" => Ok(Self::Twitter),
            _ => Err(ParseProviderError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Identity details the provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokeredIdentity {
    /// Provider-issued stable user id.
    pub id: UserId,
    /// Verified email address.
    pub email: String,
    /// Name supplied by the provider profile.
    pub display_name: String,
}

/// A live provider session, issued by the code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokeredSession {
    /// Bearer token for subsequent identity lookups.
    pub access_token: String,
    /// The identity the token belongs to.
    pub identity: BrokeredIdentity,
}

define_port_error! {
    /// Failures surfaced by identity gateway adapters.
    pub enum IdentityGatewayError {
        /// The access token is expired, revoked, or unknown.
        Expired => "identity token expired or revoked",
        /// The identity service refused the request.
        Denied { message: String } => "identity request denied: {message}",
        /// The identity service could not be reached.
        Network { message: String } => "identity service unreachable: {message}",
        /// The identity service answered with an unexpected shape.
        Protocol { message: String } => "identity response malformed: {message}",
    }
}

/// Driven port for the hosted identity service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Look up the identity behind an access token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityGatewayError::Expired`] for dead tokens and the
    /// transport variants for infrastructure failures.
    async fn identity(&self, access_token: &str) -> Result<BrokeredIdentity, IdentityGatewayError>;

    /// Build the provider authorisation URL a sign-in redirect should use.
    ///
    /// `redirect_to` is where the provider sends the browser after consent.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured base URL cannot absorb the
    /// query parameters.
    fn authorize_url(
        &self,
        provider: Provider,
        redirect_to: &str,
    ) -> Result<Url, IdentityGatewayError>;

    /// Exchange a provider callback grant code for a session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityGatewayError::Denied`] for unknown or replayed
    /// codes and the transport variants for infrastructure failures.
    async fn exchange_code(&self, code: &str) -> Result<BrokeredSession, IdentityGatewayError>;

    /// Revoke the session behind an access token.
    ///
    /// # Errors
    ///
    /// Returns an error when the identity service cannot be reached.
    async fn revoke(&self, access_token: &str) -> Result<(), IdentityGatewayError>;
}

/// Deterministic in-memory gateway for tests and local development.
///
/// One fixed identity signs in with [`FixtureIdentityGateway::CODE`] and
/// stays valid for [`FixtureIdentityGateway::ACCESS_TOKEN`]; every other
/// token reads as expired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityGateway;

impl FixtureIdentityGateway {
    /// The only access token the fixture accepts.
    pub const ACCESS_TOKEN: &'static str = "fixture-access-token";
    /// The only grant code the fixture exchanges.
    pub const CODE: &'static str = "fixture-grant-code";
    /// Id of the fixture identity.
    pub const USER_ID: &'static str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    fn fixture_identity() -> Result<BrokeredIdentity, IdentityGatewayError> {
        let id = UserId::new(Self::USER_ID)
            .map_err(|err| IdentityGatewayError::protocol(format!("fixture user id: {err}")))?;
        Ok(BrokeredIdentity {
            id,
            email: "fixture@example.com".to_owned(),
            display_name: "Fixture User".to_owned(),
        })
    }
}

#[async_trait]
impl IdentityGateway for FixtureIdentityGateway {
    async fn identity(&self, access_token: &str) -> Result<BrokeredIdentity, IdentityGatewayError> {
        if access_token == Self::ACCESS_TOKEN {
            Self::fixture_identity()
        } else {
            Err(IdentityGatewayError::expired())
        }
    }

    fn authorize_url(
        &self,
        provider: Provider,
        redirect_to: &str,
    ) -> Result<Url, IdentityGatewayError> {
        Url::parse_with_params(
            "https://identity.invalid/authorize",
            [("provider", provider.as_str()), ("redirect_to", redirect_to)],
        )
        .map_err(|err| IdentityGatewayError::protocol(err.to_string()))
    }

    async fn exchange_code(&self, code: &str) -> Result<BrokeredSession, IdentityGatewayError> {
        if code == Self::CODE {
            Ok(BrokeredSession {
                access_token: Self::ACCESS_TOKEN.to_owned(),
                identity: Self::fixture_identity()?,
            })
        } else {
            Err(IdentityGatewayError::denied("unknown grant code"))
        }
    }

    async fn revoke(&self, _access_token: &str) -> Result<(), IdentityGatewayError> {
        Ok(())
    }
}
