//! Test helpers for inbound HTTP components.

use actix_session::config::CookieContentSecurity;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};

/// Build a session middleware configured for tests.
///
/// Mirrors the production cookie policy apart from a fresh key per
/// invocation and a cleared `Secure` flag, so handler tests run over plain
/// HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    test_session_middleware_with_key(Key::generate())
}

/// Build the test session middleware around a caller-held key.
///
/// Multi-worker test servers construct one app per worker; sharing the key
/// keeps cookies readable whichever worker answers.
pub fn test_session_middleware_with_key(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_content_security(CookieContentSecurity::Private)
        .build()
}
