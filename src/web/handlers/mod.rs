//! Request handlers for the web pages.

pub mod auth;
pub mod files;

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::{Key, SignedCookieJar};

use crate::auth::SessionStore;
use crate::config::Config;
use crate::db::Database;
use crate::web::middleware::{cookie_signing_key, session_cookie, SESSION_COOKIE};
use crate::web::pages::Pages;
use crate::Result;

/// Shared state for all handlers.
///
/// The router clones this per request; fields are `Arc`s or small values.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Arc<Database>,
    /// Server-side session store.
    pub sessions: Arc<SessionStore>,
    /// Compiled page templates.
    pub pages: Arc<Pages>,
    /// Argon2 hash of the shared access password.
    pub password_hash: String,
    /// Key signing the session cookie.
    pub cookie_key: Key,
}

impl AppState {
    /// Assemble the application state.
    pub fn new(db: Arc<Database>, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            sessions: Arc::new(SessionStore::new()),
            pages: Arc::new(Pages::new()?),
            password_hash: config.password_hash.clone(),
            cookie_key: cookie_signing_key(&config.secret_key),
        })
    }
}

// Lets SignedCookieJar extract its key from the router state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}

/// Return the caller's session token, creating a fresh session when the
/// request carries no valid one.
///
/// The returned jar holds the (possibly new) session cookie and must be
/// included in the response.
pub(crate) fn ensure_session(state: &AppState, jar: SignedCookieJar) -> (String, SignedCookieJar) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let token = cookie.value().to_string();
        if state.sessions.contains(&token) {
            return (token, jar);
        }
    }

    let token = state.sessions.create();
    let jar = jar.add(session_cookie(token.clone()));
    (token, jar)
}
