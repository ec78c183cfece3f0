//! HTTP handlers: channel authorization endpoint and health.

use axum::{extract::State, http::StatusCode, Form, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::auth::AuthenticationData;
use crate::models::channel::ChannelType;
use crate::models::presence::{PresenceChannelData, UserInfo};
use crate::services::AuthService;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(auth_service: AuthService) -> Self {
        Self { auth_service }
    }

    pub fn auth_service(&self) -> &AuthService {
        &self.auth_service
    }
}

/// Form body posted by the client library when it subscribes.
#[derive(Debug, Deserialize, Validate)]
pub struct ChannelAuthRequest {
    #[validate(length(min = 1, max = 255))]
    pub socket_id: String,
    // broker limit on channel name length
    #[validate(length(min = 1, max = 164))]
    pub channel_name: String,
    /// Presence channels only.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Presence channels only: a JSON object, as a string.
    #[serde(default)]
    pub user_info: Option<String>,
}

impl ChannelAuthRequest {
    fn presence_data(&self) -> AppResult<PresenceChannelData> {
        let user_id = self
            .user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Validation("user_id is required for presence channels".to_string()))?;
        let user_info = match self.user_info.as_deref() {
            Some(raw) if !raw.is_empty() => serde_json::from_str::<UserInfo>(raw)?,
            _ => UserInfo::new(),
        };
        Ok(PresenceChannelData::new(user_id, user_info))
    }
}

/// POST /pusher/auth — sign a private or presence channel subscription.
///
/// `user_id` and `user_info` are taken from the form as posted. A real
/// deployment must fill them from its own authenticated session instead,
/// or any client can claim any identity on a presence channel.
#[instrument(skip_all)]
pub async fn channel_auth(
    State(state): State<AppState>,
    Form(body): Form<ChannelAuthRequest>,
) -> Result<Json<AuthenticationData>, AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let kind = ChannelType::from_name(&body.channel_name);
    if !kind.requires_auth() {
        return Err(AppError::InvalidChannel(format!(
            "{} is public and needs no authorization",
            body.channel_name
        )));
    }
    let presence = if kind.requires_presence_data() {
        Some(body.presence_data()?)
    } else {
        None
    };

    let data = state
        .auth_service()
        .authenticate(&body.channel_name, &body.socket_id, presence.as_ref())?;
    info!(channel = %body.channel_name, socket_id = %body.socket_id, "subscription authorized");
    Ok(Json(data))
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "pusher-auth" })),
    )
}
