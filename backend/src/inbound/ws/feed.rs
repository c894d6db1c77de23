//! Connection loop for the refresh feed.
//!
//! One loop runs per accepted socket. It multiplexes three sources: hints
//! from the broadcast hub, frames arriving from the client, and a keepalive
//! timer. Hints for the signed-in account go out as JSON text frames; the
//! feed never expects application traffic back, so inbound frames only feed
//! the liveness clock.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time;
use tracing::warn;

use crate::domain::ids::UserId;
use crate::domain::ports::RefreshSignal;
use crate::inbound::ws::messages::RefreshMessage;

/// Cadence of server pings. Tests shrink it so the loop turns over quickly.
#[cfg(not(test))]
const PING_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const PING_INTERVAL: Duration = Duration::from_millis(50);

/// A client silent for longer than this is presumed gone.
#[cfg(not(test))]
const IDLE_LIMIT: Duration = Duration::from_secs(10);
#[cfg(test)]
const IDLE_LIMIT: Duration = Duration::from_millis(100);

/// Why the loop stopped.
enum Disconnect {
    ByClient(Option<CloseReason>),
    SocketGone,
    Idle,
    BadFrame(ProtocolError),
    HubGone,
    SendFailed(Closed),
}

pub(super) async fn run_refresh_feed(
    user: UserId,
    mut session: Session,
    mut stream: MessageStream,
    mut signals: broadcast::Receiver<RefreshSignal>,
) {
    let mut idle_since = Instant::now();
    let mut ping_timer = time::interval(PING_INTERVAL);

    let cause = loop {
        let step = tokio::select! {
            _ = ping_timer.tick() => keepalive_tick(&mut session, idle_since).await,
            frame = stream.recv() => match frame {
                Some(Ok(frame)) => absorb_frame(&mut session, &mut idle_since, frame).await,
                Some(Err(error)) => Err(Disconnect::BadFrame(error)),
                None => Err(Disconnect::SocketGone),
            },
            hint = signals.recv() => relay_hint(&mut session, &user, hint).await,
        };

        if let Err(cause) = step {
            break cause;
        }
    };

    shut_down(session, cause).await;
}

async fn keepalive_tick(session: &mut Session, idle_since: Instant) -> Result<(), Disconnect> {
    if idle_since.elapsed() > IDLE_LIMIT {
        return Err(Disconnect::Idle);
    }
    session.ping(b"").await.map_err(Disconnect::SendFailed)
}

async fn absorb_frame(
    session: &mut Session,
    idle_since: &mut Instant,
    frame: Message,
) -> Result<(), Disconnect> {
    *idle_since = Instant::now();
    match frame {
        Message::Ping(payload) => session.pong(&payload).await.map_err(Disconnect::SendFailed),
        Message::Close(reason) => Err(Disconnect::ByClient(reason)),
        // Anything else proves the client is alive; the payload itself is
        // ignored because the feed is push-only.
        _ => Ok(()),
    }
}

async fn relay_hint(
    session: &mut Session,
    user: &UserId,
    hint: Result<RefreshSignal, RecvError>,
) -> Result<(), Disconnect> {
    let signal = match hint {
        Ok(signal) => signal,
        Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "refresh feed fell behind the hub; hints dropped");
            return Ok(());
        }
        Err(RecvError::Closed) => return Err(Disconnect::HubGone),
    };

    // The hub fans every account's hints to every connection; each feed
    // forwards its own and drops the rest.
    if signal.user != *user {
        return Ok(());
    }

    match serde_json::to_string(&RefreshMessage::from(&signal)) {
        Ok(body) => session.text(body).await.map_err(Disconnect::SendFailed),
        Err(error) => {
            warn!(error = %error, "refresh hint did not serialise; dropped");
            Ok(())
        }
    }
}

async fn shut_down(session: Session, cause: Disconnect) {
    let reason = match cause {
        Disconnect::ByClient(reason) => reason,
        Disconnect::Idle => {
            warn!("no client traffic within the idle limit; dropping the feed");
            close_frame(CloseCode::Normal, "idle timeout")
        }
        Disconnect::BadFrame(error) => {
            warn!(error = %error, "client broke WebSocket framing; dropping the feed");
            close_frame(CloseCode::Protocol, "protocol violation")
        }
        Disconnect::HubGone => close_frame(CloseCode::Away, "server shutting down"),
        Disconnect::SendFailed(error) => {
            warn!(error = %error, "feed write failed; client presumed gone");
            return;
        }
        Disconnect::SocketGone => return,
    };

    if let Err(error) = session.close(reason).await {
        warn!(error = %error, "refresh feed close handshake failed");
    }
}

fn close_frame(code: CloseCode, description: &str) -> Option<CloseReason> {
    Some(CloseReason {
        code,
        description: Some(description.to_owned()),
    })
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
