//! File storage repository.
//!
//! Uploaded files live entirely in the database: metadata columns plus
//! the content itself as a BLOB. There is no filesystem storage.

use chrono::{DateTime, Utc};

use super::DbPool;
use crate::{FiledropError, Result};

/// Maximum size of a stored file (16 MB).
pub const MAX_FILE_SIZE: usize = 16 * 1024 * 1024;

/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx", "zip", "rar",
];

/// Check whether a submitted file name carries an accepted extension.
///
/// The check runs against the name exactly as the browser sent it,
/// before any sanitization. Comparison is case-insensitive.
///
/// # Examples
///
/// ```
/// use filedrop::db::allowed_file;
///
/// assert!(allowed_file("report.pdf"));
/// assert!(allowed_file("PHOTO.JPG"));
/// assert!(!allowed_file("script.exe"));
/// assert!(!allowed_file("no_extension"));
/// ```
pub fn allowed_file(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.iter().any(|allowed| *allowed == ext)
        }
        None => false,
    }
}

/// Reduce a submitted file name to a safe flat name.
///
/// Path separators become word breaks, runs of whitespace collapse to a
/// single underscore, and any character outside `[A-Za-z0-9_.-]` is
/// dropped. Leading and trailing dots and underscores are stripped, so
/// relative path prefixes like `../` cannot survive. The result may be
/// empty if nothing safe remains.
pub fn sanitize_filename(name: &str) -> String {
    let name = name.replace(['/', '\\'], " ");
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    filtered
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// File listing entry.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FileMetadata {
    /// Row ID.
    pub id: i64,
    /// Name shown to users and offered on download.
    pub name: String,
    /// Upload timestamp (UTC).
    pub uploaded_at: DateTime<Utc>,
    /// Size in bytes.
    pub size: i64,
}

/// File content loaded for a download response.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredFile {
    /// Name offered to the browser.
    pub name: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

/// Repository for stored files.
pub struct FileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// List all files, newest upload first.
    pub async fn list(&self) -> Result<Vec<FileMetadata>> {
        let files = sqlx::query_as::<_, FileMetadata>(
            "SELECT id, original_filename AS name, upload_date AS uploaded_at, file_size AS size
             FROM files ORDER BY upload_date DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| FiledropError::Database(e.to_string()))?;

        Ok(files)
    }

    /// Validate and store an uploaded file.
    ///
    /// The extension check runs against `display_name` as submitted; the
    /// name is sanitized afterwards and the sanitized form is what gets
    /// stored. Validation failures come back as
    /// [`FiledropError::Validation`] carrying the user-facing message.
    pub async fn save(&self, display_name: &str, content: &[u8]) -> Result<FileMetadata> {
        if !allowed_file(display_name) {
            return Err(FiledropError::Validation("File type not allowed".to_string()));
        }

        let name = sanitize_filename(display_name);
        if name.is_empty() {
            return Err(FiledropError::Validation("File name is not valid".to_string()));
        }

        if content.len() > MAX_FILE_SIZE {
            return Err(FiledropError::Validation(format!(
                "File is too large. Maximum size: {}MB",
                MAX_FILE_SIZE / (1024 * 1024)
            )));
        }

        let uploaded_at = Utc::now();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO files (filename, original_filename, upload_date, file_size, file_data)
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&name)
        .bind(&name)
        .bind(uploaded_at)
        .bind(content.len() as i64)
        .bind(content)
        .fetch_one(self.pool)
        .await
        .map_err(|e| FiledropError::Database(e.to_string()))?;

        self.get(id)
            .await?
            .ok_or_else(|| FiledropError::NotFound("file".to_string()))
    }

    /// Get metadata for a single file.
    pub async fn get(&self, id: i64) -> Result<Option<FileMetadata>> {
        let file = sqlx::query_as::<_, FileMetadata>(
            "SELECT id, original_filename AS name, upload_date AS uploaded_at, file_size AS size
             FROM files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| FiledropError::Database(e.to_string()))?;

        Ok(file)
    }

    /// Load a file's name and content for download.
    pub async fn fetch(&self, id: i64) -> Result<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>(
            "SELECT original_filename AS name, file_data AS data FROM files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| FiledropError::Database(e.to_string()))?;

        Ok(file)
    }

    /// Delete a file. Returns whether a row was actually removed.
    pub async fn remove(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| FiledropError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of stored files.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM files")
            .fetch_one(self.pool)
            .await
            .map_err(|e| FiledropError::Database(e.to_string()))?;

        Ok(count.0)
    }
}
