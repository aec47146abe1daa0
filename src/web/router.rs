//! Router configuration for the web pages.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::auth::{login, login_page, logout};
use super::handlers::files::{delete_file, download_file, index, upload_file};
use super::handlers::AppState;
use crate::db::MAX_FILE_SIZE;

/// Request body cap: the stored-file limit plus multipart framing room.
///
/// Bodies above this are cut off at the transport before buffering; the
/// precise per-file limit is enforced again when the upload is stored.
const BODY_LIMIT: usize = MAX_FILE_SIZE + 1024 * 1024;

/// Create the main page router.
pub fn create_router(app_state: AppState) -> Router {
    // Routes reachable without a session
    let public_routes = Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout));

    // Routes behind the password gate
    let protected_routes = Router::new()
        .route("/", get(index))
        .route("/upload", post(upload_file))
        .route("/download/:id", get(download_file))
        .route("/delete/:id", post(delete_file));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
        .with_state(app_state)
}
