//! HTTP front end for the Tessera session manager.
//!
//! This crate is the transport boundary around [`tessera_session`]: it reads
//! the token cookie from requests, asks the [`Manager`](tessera_session::Manager)
//! for the matching session, and writes back whatever cookie directive the
//! manager produced.
//!
//! # Routes
//!
//! - `GET /count` - per-session visit counter
//! - `GET /session` - JSON snapshot of the caller's session
//! - `POST /logout` - destroy the session and expire its cookie
//! - `GET /read`, `GET /set` - plain cookie echo/set
//! - `GET /health`
//!
//! # Example
//!
//! ```ignore
//! use tessera_server::{Server, ServerConfig};
//! use tessera_session::{Manager, ProviderRegistry};
//!
//! let registry = ProviderRegistry::with_memory();
//! let manager = Manager::new(&registry, "memory", "gosessionid", 3600)?;
//! let server = Server::new(manager, ServerConfig::new());
//! server.run(CancellationToken::new()).await?;
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;

use std::net::SocketAddr;

use axum::Router;
use tessera_session::Manager;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The Tessera HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server around a session manager.
    pub fn new(manager: Manager, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(manager, config),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        use axum::routing::{get, post};

        let router = Router::new()
            .merge(routes::health_routes())
            // Session-backed routes
            .route("/count", get(routes::count_handler))
            .route("/session", get(routes::session_handler))
            .route("/logout", post(routes::logout_handler))
            // Plain cookie routes
            .route("/read", get(routes::read_cookies_handler))
            .route("/set", get(routes::set_cookie_handler))
            .with_state(self.state.clone());

        if self.state.config.request_logging {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }

    /// Bind the configured address and serve until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let addr = self.state.config.bind_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind: {}", e)))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` is cancelled.
    pub async fn serve(self, listener: TcpListener, shutdown: CancellationToken) -> Result<()> {
        let router = self.router();

        if let Ok(addr) = listener.local_addr() {
            info!("Starting server on {}", addr);
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

        info!("Server stopped");
        Ok(())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }

    /// Shared application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
