//! Configuration module for filedrop.
//!
//! All configuration comes from environment variables; there is no
//! configuration file. `DATABASE_URL` is required, everything else
//! falls back to a development default.

use crate::auth::hash_password;
use crate::{FiledropError, Result};

/// Default cookie-signing secret (development only).
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Default shared access password (development only).
pub const DEFAULT_PASSWORD: &str = "changeme";

/// Default port number to listen on.
pub const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to sign the session cookie.
    pub secret_key: String,
    /// Argon2 hash of the shared access password.
    ///
    /// The plain-text password is hashed during [`Config::from_env`] and
    /// never retained.
    pub password_hash: String,
    /// Database connection string.
    pub database_url: String,
    /// Port number the web server listens on.
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Supported environment variables:
    /// - `SECRET_KEY`: cookie-signing secret
    /// - `APP_PASSWORD`: shared access password
    /// - `DATABASE_URL`: database connection string (required)
    /// - `PORT`: listen port
    pub fn from_env() -> Result<Self> {
        let secret_key = env_or("SECRET_KEY", DEFAULT_SECRET_KEY);
        let password = env_or("APP_PASSWORD", DEFAULT_PASSWORD);

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            FiledropError::Config("DATABASE_URL environment variable is not set".to_string())
        })?;

        let port = match std::env::var("PORT") {
            Ok(value) if !value.is_empty() => value
                .parse()
                .map_err(|_| FiledropError::Config(format!("invalid PORT value: {}", value)))?,
            _ => DEFAULT_PORT,
        };

        let password_hash = hash_password(&password)
            .map_err(|e| FiledropError::Config(format!("failed to hash access password: {}", e)))?;

        Ok(Self {
            secret_key,
            password_hash,
            database_url,
            port,
        })
    }
}

/// Read an environment variable, falling back to a default when the
/// variable is unset or empty.
fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}
