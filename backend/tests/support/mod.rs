//! Shared fixtures for the backend integration suites.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the helpers they share live here rather than being copied into each
//! suite. The app under test is assembled the way production wires it:
//! real services over the in-memory repositories, the deterministic
//! fixture identity gateway, the cookie session at the app level, and the
//! trace layer outermost. Suites sign in by driving the real callback
//! endpoint with the fixture grant code.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use daylist_backend::Trace;
use daylist_backend::domain::ports::{
    FixtureIdentityGateway, InMemoryAccountRepository, InMemoryProjectRepository,
    InMemoryTaskRepository,
};
use daylist_backend::domain::{AccountService, IdentityService, ProjectService, TaskService};
use daylist_backend::inbound::http::state::HttpState;
use daylist_backend::inbound::http::{account, auth, projects, tasks};
use daylist_backend::outbound::refresh::RefreshHub;

/// Handles onto the stores behind the app under test.
///
/// Suites keep these to seed rows behind the HTTP surface and to observe
/// refresh traffic on the hub.
pub struct TestBackend {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub projects: Arc<InMemoryProjectRepository>,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub hub: Arc<RefreshHub>,
}

/// Fresh, empty backing stores for one test.
pub fn backend() -> TestBackend {
    TestBackend {
        tasks: Arc::new(InMemoryTaskRepository::new()),
        projects: Arc::new(InMemoryProjectRepository::new()),
        accounts: Arc::new(InMemoryAccountRepository::new()),
        hub: Arc::new(RefreshHub::default()),
    }
}

/// Build the application under test over the given stores.
///
/// `Secure` is cleared on the session cookie so the suites run over plain
/// HTTP; everything else mirrors the production wiring.
pub fn app(
    backend: &TestBackend,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let identity = Arc::new(IdentityService::new(
        Arc::new(FixtureIdentityGateway),
        Arc::clone(&backend.accounts),
    ));
    let state = HttpState::new(
        Arc::new(TaskService::new(
            Arc::clone(&backend.tasks),
            Arc::clone(&backend.hub),
        )),
        Arc::new(ProjectService::new(
            Arc::clone(&backend.projects),
            Arc::clone(&backend.hub),
        )),
        Arc::new(AccountService::new(Arc::clone(&backend.accounts))),
        identity,
    );
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_content_security(CookieContentSecurity::Private)
        .build();
    App::new()
        .app_data(web::Data::new(state))
        .wrap(session)
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task)
                .service(tasks::list_tasks)
                .service(tasks::get_task)
                .service(projects::create_project)
                .service(projects::update_project)
                .service(projects::delete_project)
                .service(projects::list_projects)
                .service(projects::get_project)
                .service(account::get_account)
                .service(account::update_time_zone)
                .service(account::delete_account)
                .service(auth::begin_sign_in)
                .service(auth::sign_in_callback)
                .service(auth::sign_out),
        )
}

/// Request driving the broker callback with the fixture grant code.
pub fn sign_in_request() -> test::TestRequest {
    test::TestRequest::get().uri(&format!(
        "/api/v1/auth/callback?code={}",
        FixtureIdentityGateway::CODE
    ))
}

/// Extract the session cookie issued on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
