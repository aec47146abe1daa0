//! Web server for filedrop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::db::Database;
use crate::{FiledropError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// Web server serving the pages.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: AppState,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// The server binds all interfaces on the configured port.
    pub fn new(config: &Config, db: Arc<Database>) -> Result<Self> {
        let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse().map_err(|_| {
            FiledropError::Config(format!("invalid listen address for port {}", config.port))
        })?;

        let app_state = AppState::new(db, config)?;

        Ok(Self { addr, app_state })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the session cleanup background task.
    ///
    /// Runs every hour and removes expired sessions from the store.
    fn start_session_cleanup_task(sessions: Arc<SessionStore>) {
        tokio::spawn(async move {
            // Session cleanup interval: 1 hour
            const CLEANUP_INTERVAL_SECS: u64 = 3600;

            let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let removed = sessions.cleanup();
                if removed > 0 {
                    tracing::info!(removed = removed, "Cleaned up expired sessions");
                } else {
                    tracing::debug!("No expired sessions to clean up");
                }
            }
        });
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let sessions = self.app_state.sessions.clone();
        let router = create_router(self.app_state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        // Start session cleanup after a successful bind
        Self::start_session_cleanup_task(sessions);

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let sessions = self.app_state.sessions.clone();
        let router = create_router(self.app_state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        Self::start_session_cleanup_task(sessions);

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
