//! Connection options for the broker's REST API.

pub const DEFAULT_REST_API_HOST: &str = "api.pusherapp.com";
pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Where REST calls to the broker go. Passed explicitly to whatever client is built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestOptions {
    encrypted: bool,
    host: String,
    /// Explicit port; when unset the port follows `encrypted`.
    port: Option<u16>,
}

impl Default for RestOptions {
    fn default() -> Self {
        Self {
            encrypted: false,
            host: DEFAULT_REST_API_HOST.to_string(),
            port: None,
        }
    }
}

impl RestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use HTTPS. Moves the default port to 443 unless a port was set.
    pub fn with_encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = encrypted;
        self
    }

    /// Host without scheme; a leading `http://` or `https://` is stripped.
    pub fn with_host(mut self, host: impl AsRef<str>) -> Self {
        let host = host.as_ref();
        let host = host
            .strip_prefix("https://")
            .or_else(|| host.strip_prefix("http://"))
            .unwrap_or(host);
        self.host = host.to_string();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None if self.encrypted => DEFAULT_HTTPS_PORT,
            None => DEFAULT_HTTP_PORT,
        }
    }

    pub fn scheme(&self) -> &'static str {
        if self.encrypted {
            "https"
        } else {
            "http"
        }
    }

    /// e.g. `https://api.pusherapp.com:443`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = RestOptions::new();
        assert_eq!(opts.host(), "api.pusherapp.com");
        assert_eq!(opts.port(), 80);
        assert_eq!(opts.base_url(), "http://api.pusherapp.com:80");
    }

    #[test]
    fn encrypted_moves_default_port() {
        let opts = RestOptions::new().with_encrypted(true);
        assert_eq!(opts.port(), 443);
        assert_eq!(opts.scheme(), "https");
    }

    #[test]
    fn explicit_port_wins_over_encrypted() {
        let opts = RestOptions::new().with_port(8443).with_encrypted(true);
        assert_eq!(opts.port(), 8443);
    }

    #[test]
    fn host_scheme_is_stripped() {
        assert_eq!(
            RestOptions::new().with_host("https://api.example.com").host(),
            "api.example.com"
        );
        assert_eq!(
            RestOptions::new().with_host("http://localhost").host(),
            "localhost"
        );
        assert_eq!(
            RestOptions::new().with_host("ftp://x").host(),
            "ftp://x"
        );
    }
}
