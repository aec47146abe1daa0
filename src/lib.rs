//! filedrop - Password-gated file drop
//!
//! A small web service that keeps uploaded files in a relational database,
//! behind a single shared password.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    hash_password, verify_password, Flash, FlashKind, PasswordError, SessionStore,
    DEFAULT_SESSION_TTL_SECS,
};
pub use config::Config;
pub use db::{
    allowed_file, sanitize_filename, Database, DbPool, FileMetadata, FileRepository, StoredFile,
    ALLOWED_EXTENSIONS, MAX_FILE_SIZE,
};
pub use error::{FiledropError, Result};
pub use web::{create_router, WebServer};
