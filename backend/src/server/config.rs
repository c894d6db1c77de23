//! Resolved settings handed to [`create_server`](super::create_server).

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use url::Url;

use crate::inbound::http::session_config::SessionSettings;
use crate::outbound::persistence::DbPool;

/// Everything the server needs before it can start: session cookie
/// material, a bind address, and optional outbound endpoints.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity_base: Option<Url>,
}

impl ServerConfig {
    /// Start from resolved session settings and a bind address. Outbound
    /// services default to their in-memory stand-ins.
    #[must_use]
    pub fn new(settings: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = settings;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            identity_base: None,
        }
    }

    /// Attach a database pool so repositories persist to Postgres.
    ///
    /// Without a pool the server runs over in-memory repositories, which
    /// suits local development and integration tests.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Point sign-in at a hosted identity service.
    ///
    /// Without a base URL the fixture gateway answers sign-in, accepting
    /// only its built-in grant code.
    #[must_use]
    pub fn with_identity_base(mut self, base: Url) -> Self {
        self.identity_base = Some(base);
        self
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
