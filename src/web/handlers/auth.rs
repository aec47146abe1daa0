//! Authentication handlers.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use crate::auth::{verify_password, Flash};
use crate::web::error::PageError;
use crate::web::handlers::{ensure_session, AppState};
use crate::web::middleware::SESSION_COOKIE;

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Submitted password. A missing field counts as an empty attempt.
    #[serde(default)]
    pub password: String,
}

/// GET /login - Render the login page.
pub async fn login_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Html<String>, PageError> {
    // Deliver flashes queued on the session, e.g. the logout notice
    let flashes = match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.take_flashes(cookie.value()),
        None => Vec::new(),
    };

    let html = state.pages.login(&flashes)?;
    Ok(Html(html))
}

/// POST /login - Check the password and unlock the session.
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    if verify_password(&form.password, &state.password_hash).is_ok() {
        let (token, jar) = ensure_session(&state, jar);
        state.sessions.authenticate(&token);
        state
            .sessions
            .flash(&token, Flash::success("Logged in successfully!"));
        tracing::info!("Login successful");

        Ok((jar, Redirect::to("/")).into_response())
    } else {
        // Wrong password re-renders the page directly; the session is
        // left untouched and further attempts stay unlimited
        tracing::warn!("Login attempt with wrong password");
        let html = state.pages.login(&[Flash::error("Wrong password!")])?;

        Ok(Html(html).into_response())
    }
}

/// GET /logout - Drop authentication and return to the login page.
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Redirect) {
    let (token, jar) = ensure_session(&state, jar);
    state.sessions.logout(&token);
    state
        .sessions
        .flash(&token, Flash::info("You have been logged out"));
    tracing::info!("Logged out");

    (jar, Redirect::to("/login"))
}
