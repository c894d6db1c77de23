//! Builders assembling handler state from server configuration.
//!
//! Each port picks a database-backed adapter when the configuration carries
//! a pool and an in-memory fallback otherwise, so `create_server` works for
//! local development and tests without external services.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    AccountRepository, FixtureIdentityGateway, IdentityResolver, InMemoryAccountRepository,
    InMemoryProjectRepository, InMemoryTaskRepository, ProjectRepository, TaskRepository,
};
use crate::domain::{AccountService, IdentityService, ProjectService, TaskService};
use crate::inbound::http::state::HttpState;
use crate::inbound::ws::state::WsState;
use crate::outbound::identity::HttpIdentityGateway;
use crate::outbound::persistence::{
    DieselAccountRepository, DieselProjectRepository, DieselTaskRepository,
};
use crate::outbound::refresh::RefreshHub;

use super::ServerConfig;

/// Build the HTTP and WebSocket handler state described by `config`.
///
/// One refresh hub is shared between the mutation services and the feed
/// subscriptions, whichever repositories back them.
pub(super) fn build_states(
    config: &ServerConfig,
) -> std::io::Result<(web::Data<HttpState>, web::Data<WsState>)> {
    let hub = Arc::new(RefreshHub::default());
    match &config.db_pool {
        Some(pool) => assemble(
            config,
            hub,
            Arc::new(DieselTaskRepository::new(pool.clone())),
            Arc::new(DieselProjectRepository::new(pool.clone())),
            Arc::new(DieselAccountRepository::new(pool.clone())),
        ),
        None => assemble(
            config,
            hub,
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(InMemoryProjectRepository::new()),
            Arc::new(InMemoryAccountRepository::new()),
        ),
    }
}

fn assemble<T, P, A>(
    config: &ServerConfig,
    hub: Arc<RefreshHub>,
    tasks: Arc<T>,
    projects: Arc<P>,
    accounts: Arc<A>,
) -> std::io::Result<(web::Data<HttpState>, web::Data<WsState>)>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    A: AccountRepository + 'static,
{
    let identity = build_identity_resolver(config, accounts.clone())?;
    let http_state = web::Data::new(HttpState::new(
        Arc::new(TaskService::new(tasks, hub.clone())),
        Arc::new(ProjectService::new(projects, hub.clone())),
        Arc::new(AccountService::new(accounts)),
        identity.clone(),
    ));
    let ws_state = web::Data::new(WsState::new(identity, hub));
    Ok((http_state, ws_state))
}

/// Select the identity gateway behind the resolver.
///
/// Building the HTTP client can fail, so the error surfaces as `io::Error`
/// the same way a failed socket bind would at startup.
fn build_identity_resolver<A>(
    config: &ServerConfig,
    accounts: Arc<A>,
) -> std::io::Result<Arc<dyn IdentityResolver>>
where
    A: AccountRepository + 'static,
{
    match &config.identity_base {
        Some(base) => {
            let gateway = HttpIdentityGateway::new(base.clone()).map_err(|error| {
                std::io::Error::other(format!("identity gateway client: {error}"))
            })?;
            Ok(Arc::new(IdentityService::new(Arc::new(gateway), accounts)))
        }
        None => Ok(Arc::new(IdentityService::new(
            Arc::new(FixtureIdentityGateway),
            accounts,
        ))),
    }
}
