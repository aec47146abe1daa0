//! File listing, upload, download and delete handlers.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::auth::Flash;
use crate::db::FileRepository;
use crate::web::error::PageError;
use crate::web::handlers::AppState;
use crate::web::middleware::Authenticated;
use crate::FiledropError;

/// Build a Content-Disposition header value for a download.
///
/// Stored names are normally ASCII-safe already, but the header is
/// hardened anyway: control characters are stripped and anything beyond
/// ASCII falls back to RFC 5987 encoding.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' => '_',
            '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// GET / - File listing page.
pub async fn index(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Html<String>, PageError> {
    let repo = FileRepository::new(state.db.pool());
    let files = repo.list().await.map_err(|e| {
        tracing::error!("Failed to list files: {}", e);
        PageError::internal("Failed to list files")
    })?;

    let flashes = state.sessions.take_flashes(&auth.token);
    let html = state.pages.index(&files, &flashes)?;
    Ok(Html(html))
}

/// POST /upload - Receive one file from the multipart form.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: Authenticated,
    mut multipart: Multipart,
) -> Result<Redirect, PageError> {
    let mut filename: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // A body over the transport cap fails before any field can
            // be read; it gets the same notice as an oversized file
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::warn!("Upload body over the request cap: {}", e);
                state.sessions.flash(
                    &auth.token,
                    Flash::error("File is too large. Maximum size: 16MB"),
                );
                return Ok(Redirect::to("/"));
            }
            Err(e) => {
                tracing::error!("Failed to read multipart field: {}", e);
                return Err(PageError::new(
                    StatusCode::BAD_REQUEST,
                    "Invalid multipart data",
                ));
            }
        };

        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            filename = field.file_name().map(|s| s.to_string());
            match field.bytes().await {
                Ok(bytes) => content = Some(bytes.to_vec()),
                Err(e) => {
                    // Reading past the transport cap fails here; nothing
                    // has been stored at this point
                    tracing::warn!("Failed to read file content: {}", e);
                    state.sessions.flash(
                        &auth.token,
                        Flash::error("File is too large. Maximum size: 16MB"),
                    );
                    return Ok(Redirect::to("/"));
                }
            }
        }
    }

    // Browsers submit an empty file name when nothing was chosen
    let filename = match filename {
        Some(name) if !name.is_empty() => name,
        _ => {
            state
                .sessions
                .flash(&auth.token, Flash::error("No file selected"));
            return Ok(Redirect::to("/"));
        }
    };
    let content = content.unwrap_or_default();

    let repo = FileRepository::new(state.db.pool());
    match repo.save(&filename, &content).await {
        Ok(saved) => {
            tracing::info!("Uploaded {} ({} bytes)", saved.name, saved.size);
            state.sessions.flash(
                &auth.token,
                Flash::success(format!("File \"{}\" uploaded successfully!", saved.name)),
            );
        }
        Err(FiledropError::Validation(message)) => {
            state.sessions.flash(&auth.token, Flash::error(message));
        }
        Err(e) => {
            tracing::error!("Failed to save file: {}", e);
            return Err(PageError::internal("Failed to save file"));
        }
    }

    Ok(Redirect::to("/"))
}

/// GET /download/:id - Download a stored file.
pub async fn download_file(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<Response, PageError> {
    let repo = FileRepository::new(state.db.pool());
    let file = repo.fetch(id).await.map_err(|e| {
        tracing::error!("Failed to load file: {}", e);
        PageError::internal("Failed to load file")
    })?;

    let file = match file {
        Some(file) => file,
        None => {
            state
                .sessions
                .flash(&auth.token, Flash::error("File not found"));
            return Ok(Redirect::to("/").into_response());
        }
    };

    let content_type = mime_guess::from_path(&file.name)
        .first_or_octet_stream()
        .to_string();

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&file.name),
        )
        .header(header::CONTENT_LENGTH, file.data.len())
        .body(Body::from(file.data))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            PageError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// POST /delete/:id - Delete a stored file.
pub async fn delete_file(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<Redirect, PageError> {
    let repo = FileRepository::new(state.db.pool());
    let removed = repo.remove(id).await.map_err(|e| {
        tracing::error!("Failed to delete file: {}", e);
        PageError::internal("Failed to delete file")
    })?;

    if removed {
        tracing::info!("Deleted file {}", id);
    }
    // Deleting an id that is already gone still reads as success
    state
        .sessions
        .flash(&auth.token, Flash::success("File deleted"));

    Ok(Redirect::to("/"))
}
