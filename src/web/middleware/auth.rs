//! Session cookie authentication.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};

use crate::web::handlers::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "filedrop_session";

/// Derive the cookie-signing key from the configured secret.
///
/// The secret is stretched through SHA-512 so that any operator-chosen
/// string yields the 64 bytes of key material the signed jar requires.
pub fn cookie_signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Build the session cookie carrying a token.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Extractor for requests that have passed the password gate.
///
/// Handlers taking this extractor only run for authenticated sessions;
/// any other request is redirected to the login page. Cookies that fail
/// signature verification are indistinguishable from absent ones.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Session token of the caller.
    pub token: String,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Redirect;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 AppState,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let jar = SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
            let token = jar
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_string());

            match token {
                Some(token) if state.sessions.is_authenticated(&token) => {
                    Ok(Authenticated { token })
                }
                _ => Err(Redirect::to("/login")),
            }
        })
    }
}
