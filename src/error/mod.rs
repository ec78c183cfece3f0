//! Application error types for robust error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required input (app key, secret, socket id) was empty.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Presence data could not be encoded. Never downgraded to a partial token.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid channel name: {0}")]
    InvalidChannel(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidArgument(_)
            | AppError::Serialization(_)
            | AppError::Validation(_)
            | AppError::InvalidChannel(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Config(msg)
            | AppError::InvalidArgument(msg)
            | AppError::Validation(msg)
            | AppError::InvalidChannel(msg)
            | AppError::Auth(msg) => msg.clone(),
            AppError::Serialization(e) => format!("Invalid presence data: {}", e),
            AppError::Internal(e) => format!("Internal error: {}", e),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<ConfigLoadError> for AppError {
    fn from(err: ConfigLoadError) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
