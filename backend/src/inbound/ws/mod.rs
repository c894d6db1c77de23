//! WebSocket inbound adapter pushing refresh hints to signed-in clients.
//!
//! The feed is one-way: after a mutation commits, the owning service
//! publishes the stale scope and every connected client of that user gets a
//! `{"scope": ...}` message telling it to re-fetch. Connections are gated on
//! the same session cookie as the HTTP API, so the upgrade shares the
//! cookie's same-site protections.

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;

mod feed;

pub mod messages;
pub mod state;

/// Upgrade a signed-in client onto its refresh feed.
#[get("/ws/refresh")]
pub async fn refresh_feed(
    state: web::Data<state::WsState>,
    session: SessionContext,
    request: HttpRequest,
    body: Payload,
) -> ApiResult<HttpResponse> {
    let context = state.identity.resolve(session.access_token()?).await;
    let user = context
        .principal()
        .map_err(|expired| Error::unauthorized(expired.to_string()))?
        .user_id()
        .clone();

    let (response, ws_session, stream) = actix_ws::handle(&request, body)
        .map_err(|error| Error::invalid_request(format!("websocket upgrade failed: {error}")))?;
    let signals = state.hub.subscribe();
    actix_web::rt::spawn(feed::run_refresh_feed(user, ws_session, stream, signals));
    Ok(response)
}
