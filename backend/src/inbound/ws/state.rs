//! Shared WebSocket adapter state.
//!
//! The feed entry point depends on the identity port for session gating and
//! on the hub for its hint subscription. Keeping both injected makes the
//! adapter testable with deterministic doubles.

use std::sync::Arc;

use crate::domain::ports::IdentityResolver;
use crate::outbound::refresh::RefreshHub;

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub identity: Arc<dyn IdentityResolver>,
    pub hub: Arc<RefreshHub>,
}

impl WsState {
    /// Construct state from explicit dependencies.
    pub fn new(identity: Arc<dyn IdentityResolver>, hub: Arc<RefreshHub>) -> Self {
        Self { identity, hub }
    }
}
