//! Authentication module for filedrop.
//!
//! This module provides password hashing for the shared access password
//! and the server-side session store that backs the browser cookie.

mod password;
mod session;

pub use password::{hash_password, verify_password, PasswordError};
pub use session::{Flash, FlashKind, SessionStore, DEFAULT_SESSION_TTL_SECS};
