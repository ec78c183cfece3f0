//! Channel authorization request and response values.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::AppResult;
use crate::models::presence::PresenceChannelData;

/// Shared application secret. Only ever used as the HMAC key.
///
/// Not serializable; `Debug` is redacted and the bytes are wiped on drop.
#[derive(Clone)]
pub struct AppSecret(String);

impl AppSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret([REDACTED])")
    }
}

impl Drop for AppSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Everything needed to authorize one subscription.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticationRequest<'a> {
    pub app_key: &'a str,
    pub app_secret: &'a AppSecret,
    pub channel_name: &'a str,
    pub socket_id: &'a str,
    pub presence_data: Option<&'a PresenceChannelData>,
}

impl<'a> AuthenticationRequest<'a> {
    pub fn new(
        app_key: &'a str,
        app_secret: &'a AppSecret,
        channel_name: &'a str,
        socket_id: &'a str,
    ) -> Self {
        Self {
            app_key,
            app_secret,
            channel_name,
            socket_id,
            presence_data: None,
        }
    }

    pub fn with_presence(mut self, presence_data: &'a PresenceChannelData) -> Self {
        self.presence_data = Some(presence_data);
        self
    }

    /// Channel name up to the first `:`.
    pub fn channel(&self) -> &'a str {
        significant_part(self.channel_name)
    }

    /// Socket id up to the first `:`.
    pub fn socket(&self) -> &'a str {
        significant_part(self.socket_id)
    }
}

/// Everything before the first `:`; the whole string if there is none.
///
/// Channel names that legitimately contain `:` are truncated too. Callers
/// must not rely on anything after the colon being signed.
pub fn significant_part(id: &str) -> &str {
    id.split_once(':').map_or(id, |(head, _)| head)
}

/// Signed response returned to the subscribing client.
///
/// Serializes to `{"auth":"<key>:<hex>"}` or, for presence channels,
/// `{"auth":"...","channel_data":"<json string>"}`. `channel_data` is
/// omitted entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationData {
    auth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channel_data: Option<String>,
}

impl AuthenticationData {
    pub fn new(auth: String, channel_data: Option<String>) -> Self {
        Self { auth, channel_data }
    }

    /// `<app_key>:<hex digest>`.
    pub fn auth(&self) -> &str {
        &self.auth
    }

    /// Double-encoded presence JSON, only for presence channels.
    pub fn channel_data(&self) -> Option<&str> {
        self.channel_data.as_deref()
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for AuthenticationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significant_part_cuts_at_first_colon() {
        assert_eq!(significant_part("private-chat:extra"), "private-chat");
        assert_eq!(significant_part("123.456:a:b"), "123.456");
        assert_eq!(significant_part("private-chat"), "private-chat");
        assert_eq!(significant_part(":tail"), "");
    }

    #[test]
    fn request_truncates_channel_and_socket() {
        let secret = AppSecret::new("s");
        let req = AuthenticationRequest::new("k", &secret, "private-chat:extra", "123.456:extra");
        assert_eq!(req.channel(), "private-chat");
        assert_eq!(req.socket(), "123.456");
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = AppSecret::new("7ad3773142a6692b25b8");
        let req = AuthenticationRequest::new("k", &secret, "private-a", "1.1");
        let dbg = format!("{:?}", req);
        assert!(!dbg.contains("7ad3773142a6692b25b8"));
        assert!(dbg.contains("REDACTED"));
    }

    #[test]
    fn private_response_omits_channel_data() {
        let data = AuthenticationData::new("key:abc".into(), None);
        assert_eq!(data.to_json().unwrap(), r#"{"auth":"key:abc"}"#);
        assert_eq!(data.to_string(), data.to_json().unwrap());
    }

    #[test]
    fn presence_response_double_encodes_channel_data() {
        let data = AuthenticationData::new(
            "key:abc".into(),
            Some(r#"{"user_id":"10","user_info":{}}"#.into()),
        );
        assert_eq!(
            data.to_string(),
            r#"{"auth":"key:abc","channel_data":"{\"user_id\":\"10\",\"user_info\":{}}"}"#
        );
    }
}
