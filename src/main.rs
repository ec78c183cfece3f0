//! Entry point: load config, wire dependencies, and run the server.

use pusher_auth::config::Config;
use pusher_auth::services::AuthService;
use pusher_auth::{create_app, AppError, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(AppError::from)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let auth_service = AuthService::new(config.app_key.clone(), config.app_secret.clone());
    let app = create_app(AppState::new(auth_service));

    tracing::info!(
        addr = %config.server_addr,
        app_key = %config.app_key,
        rest_api = %config.rest.base_url(),
        "listening"
    );
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
