//! Middleware for the web pages.

pub mod auth;

pub use auth::{cookie_signing_key, session_cookie, Authenticated, SESSION_COOKIE};
