//! Authorization for private and presence channels (Pusher-compatible HMAC).

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};
use crate::models::auth::{significant_part, AppSecret, AuthenticationData, AuthenticationRequest};
use crate::models::presence::PresenceChannelData;

type HmacSha256 = Hmac<Sha256>;

/// `socket_id:channel_name[:channel_data]`, with both ids cut at their first `:`.
pub fn string_to_sign(socket_id: &str, channel_name: &str, channel_data: Option<&str>) -> String {
    let socket = significant_part(socket_id);
    let channel = significant_part(channel_name);
    match channel_data {
        Some(data) => format!("{}:{}:{}", socket, channel, data),
        None => format!("{}:{}", socket, channel),
    }
}

fn new_mac(secret: &AppSecret) -> AppResult<HmacSha256> {
    HmacSha256::new_from_slice(secret.expose())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init: {}", e)))
}

/// Lowercase hex HMAC-SHA256 of `message` keyed by `secret`.
pub fn hmac_sha256_hex(secret: &AppSecret, message: &str) -> AppResult<String> {
    let mut mac = new_mac(secret)?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build the signed response for one subscription.
///
/// Presence data is encoded once; the same bytes are signed and returned as
/// `channel_data`.
///
/// `app_key` is copied into `auth` as is. A key containing `:` yields a
/// token the broker splits at the wrong place, so keys must be colon-free.
pub fn build_authentication(request: &AuthenticationRequest<'_>) -> AppResult<AuthenticationData> {
    if request.app_key.is_empty() {
        return Err(AppError::InvalidArgument("app_key must not be empty".to_string()));
    }
    if request.app_secret.is_empty() {
        return Err(AppError::InvalidArgument("app_secret must not be empty".to_string()));
    }
    if request.socket_id.is_empty() {
        return Err(AppError::InvalidArgument("socket_id must not be empty".to_string()));
    }

    let channel_data = request
        .presence_data
        .map(PresenceChannelData::to_canonical_json)
        .transpose()?;

    let message = string_to_sign(request.socket_id, request.channel_name, channel_data.as_deref());
    let digest = hmac_sha256_hex(request.app_secret, &message)?;

    Ok(AuthenticationData::new(
        format!("{}:{}", request.app_key, digest),
        channel_data,
    ))
}

/// Signs channel subscriptions for one app.
#[derive(Clone)]
pub struct AuthService {
    app_key: String,
    app_secret: Arc<AppSecret>,
}

impl AuthService {
    pub fn new(app_key: impl Into<String>, app_secret: AppSecret) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: Arc::new(app_secret),
        }
    }

    /// Authorize `socket_id` to subscribe to `channel_name`.
    #[instrument(skip(self, presence_data))]
    pub fn authenticate(
        &self,
        channel_name: &str,
        socket_id: &str,
        presence_data: Option<&PresenceChannelData>,
    ) -> AppResult<AuthenticationData> {
        let mut request =
            AuthenticationRequest::new(&self.app_key, &self.app_secret, channel_name, socket_id);
        if let Some(presence) = presence_data {
            request = request.with_presence(presence);
        }
        let data = build_authentication(&request)?;
        debug!(
            channel = %request.channel(),
            socket_id = %request.socket(),
            presence = presence_data.is_some(),
            "channel authorized"
        );
        Ok(data)
    }

    /// Check an `auth` token the way the broker does: rebuild the string to
    /// sign from the returned `channel_data` and compare digests in constant time.
    pub fn verify_channel_auth(
        &self,
        channel_name: &str,
        socket_id: &str,
        auth: &str,
        channel_data: Option<&str>,
    ) -> AppResult<()> {
        let (key, signature) = auth
            .split_once(':')
            .ok_or_else(|| AppError::Auth("malformed auth token".to_string()))?;
        if key != self.app_key {
            return Err(AppError::Auth("unknown app key".to_string()));
        }
        let signature =
            hex::decode(signature).map_err(|_| AppError::Auth("malformed auth signature".to_string()))?;

        let mut mac = new_mac(&self.app_secret)?;
        mac.update(string_to_sign(socket_id, channel_name, channel_data).as_bytes());
        mac.verify_slice(&signature).map_err(|_| {
            debug!(channel = %significant_part(channel_name), "auth signature mismatch");
            AppError::Auth("invalid auth signature".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &str = "278d425bdf160c739803";
    const SECRET: &str = "7ad3773142a6692b25b8";

    fn service() -> AuthService {
        AuthService::new(KEY, AppSecret::new(SECRET))
    }

    fn mr_pusher() -> PresenceChannelData {
        let mut info = serde_json::Map::new();
        info.insert("name".into(), json!("Mr. Pusher"));
        PresenceChannelData::new("10", info)
    }

    fn is_well_formed(auth: &str) -> bool {
        match auth.split_once(':') {
            Some((key, hex)) => {
                !key.is_empty()
                    && hex.len() == 64
                    && hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            }
            None => false,
        }
    }

    #[test]
    fn private_channel_matches_published_signature() {
        let data = service().authenticate("private-foobar", "1234.1234", None).unwrap();
        assert_eq!(
            data.auth(),
            "278d425bdf160c739803:58df8b0c36d6982b82c3ecf6b4662e34fe8c25bba48f5369f135bf843651c3a4"
        );
        assert!(data.channel_data().is_none());
    }

    #[test]
    fn presence_channel_signs_channel_data() {
        let data = service()
            .authenticate("presence-foobar", "1234.1234", Some(&mr_pusher()))
            .unwrap();
        let channel_data = data.channel_data().unwrap();
        assert_eq!(channel_data, r#"{"user_id":"10","user_info":{"name":"Mr. Pusher"}}"#);

        let secret = AppSecret::new(SECRET);
        let expected = hmac_sha256_hex(
            &secret,
            &format!("1234.1234:presence-foobar:{}", channel_data),
        )
        .unwrap();
        assert_eq!(data.auth(), format!("{}:{}", KEY, expected));
    }

    #[test]
    fn output_is_deterministic() {
        let svc = service();
        let a = svc.authenticate("presence-x", "1.2", Some(&mr_pusher())).unwrap();
        let b = svc.authenticate("presence-x", "1.2", Some(&mr_pusher())).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn auth_is_key_colon_lowercase_hex() {
        let svc = service();
        for (channel, socket) in [("private-a", "1.1"), ("presence-b", "99.3"), ("private-ü", "x")] {
            let data = svc.authenticate(channel, socket, None).unwrap();
            assert!(is_well_formed(data.auth()), "{}", data.auth());
        }
    }

    #[test]
    fn colon_suffixes_are_ignored() {
        let svc = service();
        let full = svc.authenticate("private-chat:extra", "123.456:extra", None).unwrap();
        let bare = svc.authenticate("private-chat", "123.456", None).unwrap();
        assert_eq!(full.auth(), bare.auth());
    }

    #[test]
    fn app_key_is_copied_verbatim() {
        let data = AuthService::new("a:b", AppSecret::new(SECRET))
            .authenticate("private-foobar", "1234.1234", None)
            .unwrap();
        let digest = data.auth().strip_prefix("a:b:").unwrap();
        assert_eq!(digest.len(), 64);
        assert!(!is_well_formed(data.auth()));
    }

    #[test]
    fn empty_secret_is_rejected() {
        let svc = AuthService::new(KEY, AppSecret::new(""));
        let err = svc.authenticate("private-foobar", "1234.1234", None).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn empty_key_or_socket_is_rejected() {
        let err = AuthService::new("", AppSecret::new(SECRET))
            .authenticate("private-a", "1.1", None)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));

        let err = service().authenticate("private-a", "", None).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn response_never_contains_secret() {
        let mut info = serde_json::Map::new();
        info.insert("note".into(), json!("hello"));
        let presence = PresenceChannelData::new("1", info);
        let data = service().authenticate("presence-a", "1.1", Some(&presence)).unwrap();
        assert!(!data.to_string().contains(SECRET));
    }

    #[test]
    fn verify_accepts_own_tokens() {
        let svc = service();
        let data = svc.authenticate("presence-foobar", "1234.1234", Some(&mr_pusher())).unwrap();
        assert!(svc
            .verify_channel_auth("presence-foobar", "1234.1234", data.auth(), data.channel_data())
            .is_ok());

        let private = svc.authenticate("private-foo", "123.456", None).unwrap();
        assert!(svc
            .verify_channel_auth("private-foo", "123.456", private.auth(), None)
            .is_ok());
    }

    #[test]
    fn verify_rejects_tampering() {
        let svc = service();
        let data = svc.authenticate("presence-foobar", "1234.1234", Some(&mr_pusher())).unwrap();
        let tampered = r#"{"user_id":"11","user_info":{"name":"Mr. Pusher"}}"#;
        assert!(matches!(
            svc.verify_channel_auth("presence-foobar", "1234.1234", data.auth(), Some(tampered)),
            Err(AppError::Auth(_))
        ));
        assert!(svc
            .verify_channel_auth("private-foo", "123.456", "wrong", None)
            .is_err());
        assert!(svc
            .verify_channel_auth("private-foo", "123.456", "other-key:00", None)
            .is_err());
    }
}
