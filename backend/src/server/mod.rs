//! HTTP server assembly: session middleware, route mounting, and the
//! listener.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::account::{delete_account, get_account, update_time_zone};
use crate::inbound::http::auth::{begin_sign_in, sign_in_callback, sign_out};
use crate::inbound::http::projects::{
    create_project, delete_project, get_project, list_projects, update_project,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tasks::{create_task, delete_task, get_task, list_tasks, update_task};
use crate::inbound::ws;
use crate::inbound::ws::state::WsState;
use crate::middleware::Trace;
use state_builders::build_states;

const SESSION_TTL: actix_web::cookie::time::Duration = actix_web::cookie::time::Duration::hours(2);

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(SESSION_TTL))
        .build()
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        ws_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = session_middleware(key, cookie_secure, same_site);

    let api = web::scope("/api/v1")
        .service(create_task)
        .service(update_task)
        .service(delete_task)
        .service(list_tasks)
        .service(get_task)
        .service(create_project)
        .service(update_project)
        .service(delete_project)
        .service(list_projects)
        .service(get_project)
        .service(get_account)
        .service(update_time_zone)
        .service(delete_account)
        .service(begin_sign_in)
        .service(sign_in_callback)
        .service(sign_out);

    // The refresh feed sits outside the API scope but still reads the session
    // cookie, so the session middleware wraps the whole app.
    let app = App::new()
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(session)
        .wrap(Trace)
        .service(api)
        .service(ws::refresh_feed);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Assemble the application and bind the listener.
///
/// The returned [`Server`] does nothing until awaited.
///
/// # Errors
/// Returns [`std::io::Error`] when building shared state or binding
/// `bind_addr` fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let (http_state, ws_state) = build_states(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        identity_base: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
