//! Pusher-compatible channel authorization server built with Rust.
//!
//! Signs private and presence channel subscriptions with HMAC-SHA256 over
//! `socket_id:channel_name[:channel_data]` so the client library and the
//! broker can verify them without ever seeing the app secret.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;
pub use models::{AppSecret, AuthenticationData, AuthenticationRequest, PresenceChannelData};
pub use services::AuthService;

use axum::routing::{get, post};
use handlers::http;
use tower_http::trace::TraceLayer;

/// Build the API router (auth, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/pusher/auth", post(http::channel_auth))
        .route("/health", get(http::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
