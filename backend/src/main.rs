//! Daylist backend entry point: resolves configuration and runs the server.

use std::env;
use std::net::SocketAddr;

use clap::Parser;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use daylist_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use daylist_backend::outbound::persistence::{DbPool, PoolConfig};
use daylist_backend::server::{ServerConfig, create_server};

/// `daylist-backend` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "daylist-backend",
    about = "Task and project backend serving the form-action API",
    version
)]
struct CliArgs {
    /// Socket address to listen on.
    #[arg(long = "bind", value_name = "addr", default_value = "0.0.0.0:8080")]
    bind_addr: SocketAddr,
    /// Postgres connection URL. Falls back to `DATABASE_URL` when omitted;
    /// without either the server runs on in-memory repositories.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Identity service base URL. Falls back to `IDENTITY_BASE_URL`; without
    /// either the fixture gateway answers sign-in.
    #[arg(long = "identity-url", value_name = "url")]
    identity_url: Option<Url>,
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = CliArgs::parse();

    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let settings = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(settings, args.bind_addr);

    if let Some(database_url) = resolve_database_url(args.database_url) {
        let pool = DbPool::new(PoolConfig::new(&database_url))
            .await
            .map_err(|error| std::io::Error::other(format!("create database pool: {error}")))?;
        config = config.with_db_pool(pool);
    } else {
        info!("no database configured; using in-memory repositories");
    }

    if let Some(identity_url) = resolve_identity_url(args.identity_url)? {
        config = config.with_identity_base(identity_url);
    } else {
        info!("no identity service configured; using the fixture gateway");
    }

    info!(addr = %args.bind_addr, "starting server");
    create_server(config)?.await
}

fn resolve_database_url(cli_value: Option<String>) -> Option<String> {
    cli_value.or_else(|| env::var("DATABASE_URL").ok())
}

fn resolve_identity_url(cli_value: Option<Url>) -> std::io::Result<Option<Url>> {
    if cli_value.is_some() {
        return Ok(cli_value);
    }
    match env::var("IDENTITY_BASE_URL") {
        Ok(raw) => Url::parse(&raw)
            .map(Some)
            .map_err(|error| std::io::Error::other(format!("IDENTITY_BASE_URL: {error}"))),
        Err(_) => Ok(None),
    }
}
