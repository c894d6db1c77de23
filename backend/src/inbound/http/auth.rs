//! Sign-in flow HTTP handlers.
//!
//! ```text
//! GET  /api/v1/auth/sign-in/{provider}
//! GET  /api/v1/auth/callback
//! POST /api/v1/auth/sign-out
//! ```
//!
//! The browser is sent to the identity broker and returns to the callback
//! with a grant code; completing the exchange stores the account and access
//! token in the cookie session. Broken or refused callbacks land on the
//! sign-in error page rather than a JSON error, since the caller is a
//! browser mid-redirect.

use std::str::FromStr;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::Provider;
use crate::domain::{ActionResult, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Application page shown once sign-in completes.
const SIGNED_IN_REDIRECT: &str = "/app/today";
/// Error page for refused or broken callbacks.
const SIGN_IN_ERROR_REDIRECT: &str = "/auth/sign-in/error";

/// Query parameters delivered by the broker callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

fn found(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

fn callback_url(request: &HttpRequest) -> String {
    let info = request.connection_info();
    format!("{}://{}/api/v1/auth/callback", info.scheme(), info.host())
}

/// Start a sign-in attempt by redirecting to the identity broker.
#[utoipa::path(
    get,
    path = "/api/v1/auth/sign-in/{provider}",
    params(
        ("provider" = String, Path, description = "facebook, github, google, linkedin, or twitter")
    ),
    responses(
        (status = 302, description = "Redirect to the identity broker"),
        (status = 400, description = "Unknown provider", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "beginSignIn"
)]
#[get("/auth/sign-in/{provider}")]
pub async fn begin_sign_in(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let raw = path.into_inner();
    let provider = Provider::from_str(&raw).map_err(|_| {
        Error::invalid_request("unknown sign-in provider").with_details(json!({
            "field": "provider",
            "value": raw,
        }))
    })?;
    let url = state
        .identity
        .begin_sign_in(provider, &callback_url(&request))
        .await?;
    Ok(found(String::from(url)))
}

/// Complete a sign-in attempt from the broker callback.
#[utoipa::path(
    get,
    path = "/api/v1/auth/callback",
    params(
        ("code" = Option<String>, Query, description = "Grant code issued by the broker")
    ),
    responses(
        (status = 302, description = "Redirect into the application, or to the sign-in error page"),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "completeSignIn"
)]
#[get("/auth/callback")]
pub async fn sign_in_callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let Some(code) = query.into_inner().code else {
        warn!("broker callback arrived without a grant code");
        return Ok(found(SIGN_IN_ERROR_REDIRECT));
    };
    match state.identity.complete_sign_in(&code).await {
        Ok(signed_in) => {
            session.persist_sign_in(&signed_in)?;
            Ok(found(SIGNED_IN_REDIRECT))
        }
        Err(error) => {
            warn!(error = %error, "sign-in completion failed");
            Ok(found(SIGN_IN_ERROR_REDIRECT))
        }
    }
}

/// Sign the caller out and clear the cookie session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    responses(
        (status = 200, description = "Envelope with data: null"),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signOut",
    security(("SessionCookie" = []))
)]
#[post("/auth/sign-out")]
pub async fn sign_out(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let Some(token) = session.access_token()? {
        state.identity.sign_out(&token).await;
    }
    session.purge();
    Ok(HttpResponse::Ok().json(ActionResult::success(())))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod auth_tests;
