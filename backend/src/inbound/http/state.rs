//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountActions, IdentityResolver, ProjectActions, TaskActions};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub tasks: Arc<dyn TaskActions>,
    pub projects: Arc<dyn ProjectActions>,
    pub account: Arc<dyn AccountActions>,
    pub identity: Arc<dyn IdentityResolver>,
}

impl HttpState {
    /// Build handler state from the driving ports.
    pub fn new(
        tasks: Arc<dyn TaskActions>,
        projects: Arc<dyn ProjectActions>,
        account: Arc<dyn AccountActions>,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            tasks,
            projects,
            account,
            identity,
        }
    }
}
