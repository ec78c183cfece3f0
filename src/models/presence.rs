//! Presence channel member data and its canonical encoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::models::finite::ensure_finite;

/// Arbitrary per-user info shown to other presence subscribers.
pub type UserInfo = Map<String, Value>;

/// Member data for a presence channel subscription.
///
/// Field declaration order is the wire order: `user_id` then `user_info`.
/// The client recomputes the signature from the `channel_data` string we
/// return, so the encoding must be byte-stable. `user_info` keeps insertion
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceChannelData {
    pub user_id: String,
    #[serde(default)]
    pub user_info: UserInfo,
}

impl PresenceChannelData {
    pub fn new(user_id: impl Into<String>, user_info: UserInfo) -> Self {
        Self {
            user_id: user_id.into(),
            user_info,
        }
    }

    /// Build from any serializable user-info value. It must encode to a JSON
    /// object with only finite numbers.
    pub fn with_info<T: Serialize>(user_id: impl Into<String>, info: &T) -> AppResult<Self> {
        ensure_finite(info)?;
        match serde_json::to_value(info)? {
            Value::Object(user_info) => Ok(Self::new(user_id, user_info)),
            other => Err(AppError::Serialization(serde::ser::Error::custom(format!(
                "user_info must be a JSON object, got {}",
                json_kind(&other)
            )))),
        }
    }

    /// Compact JSON, e.g. `{"user_id":"10","user_info":{"name":"Mr. Pusher"}}`.
    ///
    /// Same value in, same bytes out: no whitespace, fixed field order,
    /// serde_json string escaping and number formatting.
    pub fn to_canonical_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
