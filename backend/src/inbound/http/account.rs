//! Account settings HTTP handlers.
//!
//! ```text
//! GET  /api/v1/account
//! POST /api/v1/account/time-zone
//! POST /api/v1/account/delete
//! ```
//!
//! The profile never exposes the user id; clients only see the fields the
//! settings screen renders.

use actix_web::{HttpResponse, get, post, web};
use utoipa::ToSchema;

use crate::domain::{ActionResult, Profile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::forms::{self, FormBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Form fields accepted by the time zone endpoint.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TimeZoneForm {
    /// IANA zone name, e.g. `Europe/London`.
    time_zone: String,
}

/// Fetch the caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/account",
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Profile>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "getAccount",
    security(("SessionCookie" = []))
)]
#[get("/account")]
pub async fn get_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state.account.profile(&ctx).await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Change the caller's time zone from a form submission.
#[utoipa::path(
    post,
    path = "/api/v1/account/time-zone",
    request_body(
        content = TimeZoneForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionResult<Profile>),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "updateTimeZone",
    security(("SessionCookie" = []))
)]
#[post("/account/time-zone")]
pub async fn update_time_zone(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: FormBody,
) -> ApiResult<HttpResponse> {
    let ctx = state.identity.resolve(session.access_token()?).await;
    let outcome = state
        .account
        .update_time_zone(&ctx, &forms::submission(body))
        .await;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Delete the caller's account, sign the provider session out, and clear
/// the cookie.
#[utoipa::path(
    post,
    path = "/api/v1/account/delete",
    responses(
        (status = 200, description = "Envelope with data: null on success, or errors"),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["account"],
    operation_id = "deleteAccount",
    security(("SessionCookie" = []))
)]
#[post("/account/delete")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let token = session.access_token()?;
    let ctx = state.identity.resolve(token.clone()).await;
    let outcome = state.account.delete_account(&ctx).await;
    if outcome.is_success() {
        if let Some(token) = token {
            state.identity.sign_out(&token).await;
        }
        session.purge();
    }
    Ok(HttpResponse::Ok().json(outcome))
}

#[cfg(test)]
#[path = "account_tests.rs"]
mod account_tests;
