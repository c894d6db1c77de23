//! HTTP adapter for the hosted identity service.
//!
//! Only transport concerns live here: resolving endpoints under the
//! configured base URL, mapping failure statuses onto gateway errors, and
//! decoding JSON bodies into brokered identities. The REST surface is
//! `/authorize` for the provider redirect, `/token` for the callback grant
//! exchange, `/user` for resolving a bearer token, and `/logout` for
//! revocation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::json;

use super::dto::{SessionDto, UserDto};
use crate::domain::ports::{
    BrokeredIdentity, BrokeredSession, IdentityGateway, IdentityGatewayError, Provider,
};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway speaking to a single identity service installation.
pub struct HttpIdentityGateway {
    client: Client,
    base_url: Url,
}

impl HttpIdentityGateway {
    /// Build a gateway with the default request timeout.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build a gateway that gives up on requests after `timeout`.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    /// Resolve a relative endpoint under the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, IdentityGatewayError> {
        // `Url::join` drops the last path segment unless the base ends in '/'.
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(path)
            .map_err(|error| IdentityGatewayError::protocol(format!("endpoint {path}: {error}")))
    }
}

#[async_trait]
impl IdentityGateway for HttpIdentityGateway {
    async fn identity(&self, access_token: &str) -> Result<BrokeredIdentity, IdentityGatewayError> {
        let response = self
            .client
            .get(self.endpoint("user")?)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(IdentityGatewayError::expired());
        }
        let body = require_success(response).await?;
        parse_identity(&body)
    }

    fn authorize_url(
        &self,
        provider: Provider,
        redirect_to: &str,
    ) -> Result<Url, IdentityGatewayError> {
        let mut url = self.endpoint("authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to);
        Ok(url)
    }

    async fn exchange_code(&self, code: &str) -> Result<BrokeredSession, IdentityGatewayError> {
        let response = self
            .client
            .post(self.endpoint("token")?)
            .query(&[("grant_type", "pkce")])
            .header(ACCEPT, "application/json")
            .json(&json!({ "auth_code": code }))
            .send()
            .await
            .map_err(transport_error)?;

        let body = require_success(response).await?;
        parse_session(&body)
    }

    async fn revoke(&self, access_token: &str) -> Result<(), IdentityGatewayError> {
        let response = self
            .client
            .post(self.endpoint("logout")?)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error)?;

        // A token the service no longer recognises is already signed out.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        require_success(response).await?;
        Ok(())
    }
}

/// Consume the response, handing back the body only for 2xx statuses.
async fn require_success(response: Response) -> Result<Vec<u8>, IdentityGatewayError> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?;
    if status.is_success() {
        Ok(body.to_vec())
    } else {
        Err(status_error(status, &body))
    }
}

fn parse_identity(body: &[u8]) -> Result<BrokeredIdentity, IdentityGatewayError> {
    let decoded: UserDto = serde_json::from_slice(body)
        .map_err(|error| IdentityGatewayError::protocol(format!("invalid user payload: {error}")))?;
    decoded
        .into_brokered_identity()
        .map_err(IdentityGatewayError::protocol)
}

fn parse_session(body: &[u8]) -> Result<BrokeredSession, IdentityGatewayError> {
    let decoded: SessionDto = serde_json::from_slice(body).map_err(|error| {
        IdentityGatewayError::protocol(format!("invalid session payload: {error}"))
    })?;
    decoded
        .into_brokered_session()
        .map_err(IdentityGatewayError::protocol)
}

fn transport_error(error: reqwest::Error) -> IdentityGatewayError {
    IdentityGatewayError::network(error.to_string())
}

fn status_error(status: StatusCode, body: &[u8]) -> IdentityGatewayError {
    let mut message = format!("status {}", status.as_u16());
    let preview = condensed_body(body);
    if !preview.is_empty() {
        message.push_str(": ");
        message.push_str(&preview);
    }

    if status.is_client_error() {
        IdentityGatewayError::denied(message)
    } else {
        IdentityGatewayError::network(message)
    }
}

/// Flatten the body onto one line and cap its length so failure messages
/// stay readable.
fn condensed_body(body: &[u8]) -> String {
    const MAX_CHARS: usize = 160;

    let flat = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    match flat.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for endpoint resolution and payload mapping; nothing
    //! here opens a socket.

    use rstest::rstest;

    use super::*;

    fn gateway(base: &str) -> HttpIdentityGateway {
        let url = Url::parse(base).expect("base url");
        HttpIdentityGateway::new(url).expect("client")
    }

    #[rstest]
    #[case::with_trailing_slash("https://identity.example.com/auth/v1/")]
    #[case::without_trailing_slash("https://identity.example.com/auth/v1")]
    fn authorize_url_resolves_under_the_base_path(#[case] base: &str) {
        let url = gateway(base)
            .authorize_url(Provider::Github, "https://app.example.com/auth/callback")
            .expect("authorize url");

        assert_eq!(url.path(), "/auth/v1/authorize");
        let query = url.query().unwrap_or_default();
        assert!(query.contains("provider=github"));
        assert!(query.contains("redirect_to=https%3A%2F%2Fapp.example.com%2Fauth%2Fcallback"));
    }

    #[rstest]
    #[case::bad_request(StatusCode::BAD_REQUEST)]
    #[case::forbidden(StatusCode::FORBIDDEN)]
    fn client_statuses_map_to_denied(#[case] status: StatusCode) {
        let error = status_error(status, b"{\"error\":\"invalid grant\"}");

        assert!(matches!(error, IdentityGatewayError::Denied { .. }));
        assert!(error.to_string().contains("invalid grant"));
    }

    #[rstest]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR)]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY)]
    fn server_statuses_map_to_network_errors(#[case] status: StatusCode) {
        let error = status_error(status, b"");

        assert!(matches!(error, IdentityGatewayError::Network { .. }));
    }

    #[test]
    fn long_failure_bodies_are_condensed() {
        let body = format!("line one\nline   two {}", "x".repeat(400));

        let preview = condensed_body(body.as_bytes());

        assert!(preview.starts_with("line one line two x"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[test]
    fn parses_a_user_with_a_profile_name() {
        let body = r#"{
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "email": "ada@example.com",
            "user_metadata": { "name": "Ada Lovelace" }
        }"#;

        let identity = parse_identity(body.as_bytes()).expect("identity should decode");

        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.display_name, "Ada Lovelace");
    }

    #[test]
    fn a_user_without_a_profile_name_falls_back_to_the_email() {
        let body = r#"{
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "email": "ada@example.com",
            "user_metadata": {}
        }"#;

        let identity = parse_identity(body.as_bytes()).expect("identity should decode");

        assert_eq!(identity.display_name, "ada@example.com");
    }

    #[test]
    fn rejects_a_user_with_a_malformed_id() {
        let body = r#"{ "id": "not-a-uuid", "email": "ada@example.com" }"#;

        let error = parse_identity(body.as_bytes()).expect_err("decode should fail");

        assert!(matches!(error, IdentityGatewayError::Protocol { .. }));
    }

    #[test]
    fn parses_a_session_with_its_user() {
        let body = r#"{
            "access_token": "opaque-token",
            "token_type": "bearer",
            "user": {
                "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "email": "ada@example.com",
                "user_metadata": { "name": "Ada" }
            }
        }"#;

        let session = parse_session(body.as_bytes()).expect("session should decode");

        assert_eq!(session.access_token, "opaque-token");
        assert_eq!(session.identity.display_name, "Ada");
    }

    #[test]
    fn rejects_a_session_without_an_access_token() {
        let body = r#"{
            "access_token": "",
            "user": { "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "email": "a@b.c" }
        }"#;

        let error = parse_session(body.as_bytes()).expect_err("decode should fail");

        assert!(matches!(error, IdentityGatewayError::Protocol { .. }));
    }
}
