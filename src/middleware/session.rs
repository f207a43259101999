//! Session cookie middleware
//!
//! Resolves the caller's [`SessionId`] from the `engine_session` cookie and
//! stores it in request extensions. Requests without a valid cookie get a
//! fresh session, and the cookie is set on the response.

use crate::session::SessionId;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "engine_session";

fn session_from_jar(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// Attach a session ID to every request, issuing one on first contact
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());

    let (session_id, is_new) = match session_from_jar(&jar) {
        Some(id) => (id, false),
        None => (SessionId::new(), true),
    };

    request.extensions_mut().insert(session_id);
    let response = next.run(request).await;

    if !is_new {
        return response;
    }

    tracing::debug!(session_id = %session_id, "Issuing session cookie");

    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), response).into_response()
}
