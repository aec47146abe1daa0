//! Error handling for the web pages.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::FiledropError;

/// Error surfaced to the browser when a handler fails.
///
/// Expected conditions (wrong password, missing file, rejected upload)
/// are reported through flash messages and never reach this type; it
/// covers the genuinely unexpected failures.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    /// Create a new page error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Create a 404 Not Found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// The HTTP status this error renders as.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let body = format!(
            "<!DOCTYPE html>\n<html><head><title>{}</title></head>\
             <body><h1>{}</h1><p>{}</p></body></html>",
            self.status, self.status, self.message
        );
        (self.status, Html(body)).into_response()
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for PageError {}

impl From<FiledropError> for PageError {
    fn from(err: FiledropError) -> Self {
        match &err {
            FiledropError::NotFound(what) => PageError::not_found(format!("{} not found", what)),
            _ => {
                // Log the detail, show the browser a generic message
                tracing::error!("Internal error: {}", err);
                PageError::internal("Something went wrong")
            }
        }
    }
}
