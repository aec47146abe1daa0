//! Server-side session management for filedrop.
//!
//! Sessions are identified by an opaque random token carried in a signed
//! browser cookie. All session state (the authentication flag and pending
//! flash messages) lives in this in-memory store; the cookie never holds
//! anything but the token.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use uuid::Uuid;

/// Default session duration (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Category of a flash message, mirrored into the page as a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

/// A one-shot notification queued for the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }
}

/// State attached to one session token.
#[derive(Debug)]
struct SessionEntry {
    authenticated: bool,
    flashes: Vec<Flash>,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_live(&self) -> bool {
        self.expires_at > Instant::now()
    }
}

/// In-memory session store.
///
/// Expired entries are treated as absent by every accessor and are
/// dropped either on access or by a periodic [`cleanup`](Self::cleanup).
#[derive(Debug)]
pub struct SessionStore {
    entries: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store with the default session duration.
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }

    /// Create a store with a custom session duration.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a new unauthenticated session and return its token.
    pub fn create(&self) -> String {
        let token = Uuid::new_v4().to_string();
        let entry = SessionEntry {
            authenticated: false,
            flashes: Vec::new(),
            expires_at: Instant::now() + self.ttl,
        };
        self.lock().insert(token.clone(), entry);
        tracing::debug!("Created session {}", token);
        token
    }

    /// Check whether a token refers to a live session.
    pub fn contains(&self, token: &str) -> bool {
        let mut entries = self.lock();
        match entries.get(token) {
            Some(entry) if entry.is_live() => true,
            Some(_) => {
                entries.remove(token);
                false
            }
            None => false,
        }
    }

    /// Check whether the session holding this token has passed the password gate.
    pub fn is_authenticated(&self, token: &str) -> bool {
        let mut entries = self.lock();
        match entries.get(token) {
            Some(entry) if entry.is_live() => entry.authenticated,
            Some(_) => {
                entries.remove(token);
                false
            }
            None => false,
        }
    }

    /// Mark a session as authenticated after a successful password check.
    pub fn authenticate(&self, token: &str) {
        let mut entries = self.lock();
        if let Some(entry) = entries.get_mut(token) {
            entry.authenticated = true;
        }
    }

    /// Drop the authentication flag.
    ///
    /// The session itself survives so that a farewell flash queued on it
    /// can still be delivered on the next page load.
    pub fn logout(&self, token: &str) {
        let mut entries = self.lock();
        if let Some(entry) = entries.get_mut(token) {
            entry.authenticated = false;
        }
    }

    /// Queue a flash message on a session.
    ///
    /// Flashes queued on unknown or expired tokens are dropped.
    pub fn flash(&self, token: &str, flash: Flash) {
        let mut entries = self.lock();
        match entries.get_mut(token) {
            Some(entry) if entry.is_live() => entry.flashes.push(flash),
            _ => tracing::debug!("Dropping flash for unknown session"),
        }
    }

    /// Take all queued flash messages, leaving the queue empty.
    pub fn take_flashes(&self, token: &str) -> Vec<Flash> {
        let mut entries = self.lock();
        match entries.get_mut(token) {
            Some(entry) if entry.is_live() => std::mem::take(&mut entry.flashes),
            _ => Vec::new(),
        }
    }

    /// Remove expired sessions. Returns the number of sessions removed.
    pub fn cleanup(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until cleanup runs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
