//! Outbound HTTP proxy settings for the playlist client.
//!
//! Unrelated to the passthrough fallback in [`crate::fetcher`]: this proxy
//! carries every request the client makes, the passthrough is a separate
//! upstream that is only asked after a direct attempt failed.

use reqwest::Proxy;

use crate::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyType {
    Http,
    Https,
    Socks5,
    /// Proxy both plain and TLS traffic.
    All,
}

impl ProxyType {
    /// Infers the proxy type from a URL scheme. Unknown schemes proxy all traffic.
    pub fn from_url(url: &str) -> Self {
        match url.split_once("://").map(|(scheme, _)| scheme) {
            Some("socks5") | Some("socks5h") => Self::Socks5,
            Some("https") => Self::Https,
            Some("http") => Self::Http,
            _ => Self::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub url: String,
    pub proxy_type: ProxyType,
    pub auth: Option<ProxyAuth>,
}

impl ProxyConfig {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            proxy_type: ProxyType::from_url(&url),
            url,
            auth: None,
        }
    }

    /// Attaches credentials when both parts are present.
    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        self.auth = match (username, password) {
            (Some(username), Some(password)) => Some(ProxyAuth { username, password }),
            _ => None,
        };
        self
    }

    pub(crate) fn to_reqwest(&self) -> Result<Proxy, FetchError> {
        let invalid = |e: reqwest::Error| FetchError::ProxyError(format!("{}: {e}", self.url));

        let mut proxy = match self.proxy_type {
            ProxyType::Http => Proxy::http(&self.url).map_err(invalid)?,
            ProxyType::Https => Proxy::https(&self.url).map_err(invalid)?,
            ProxyType::Socks5 if !self.url.contains("://") => {
                Proxy::all(format!("socks5://{}", self.url)).map_err(invalid)?
            }
            ProxyType::Socks5 | ProxyType::All => Proxy::all(&self.url).map_err(invalid)?,
        };

        if let Some(auth) = &self.auth {
            proxy = proxy.basic_auth(&auth.username, &auth.password);
        }
        Ok(proxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_follows_scheme() {
        assert_eq!(ProxyType::from_url("socks5://127.0.0.1:1080"), ProxyType::Socks5);
        assert_eq!(ProxyType::from_url("http://proxy:8080"), ProxyType::Http);
        assert_eq!(ProxyType::from_url("https://proxy:8443"), ProxyType::Https);
        assert_eq!(ProxyType::from_url("proxy:8080"), ProxyType::All);
    }

    #[test]
    fn credentials_need_both_parts() {
        let half = ProxyConfig::new("http://proxy:8080").with_credentials(Some("user".into()), None);
        assert!(half.auth.is_none());

        let full = ProxyConfig::new("http://proxy:8080")
            .with_credentials(Some("user".into()), Some("pass".into()));
        assert_eq!(full.auth.unwrap().username, "user");
    }

    #[test]
    fn builds_reqwest_proxy() {
        assert!(ProxyConfig::new("http://proxy.example.com:8080").to_reqwest().is_ok());
        let mut bare = ProxyConfig::new("127.0.0.1:1080");
        bare.proxy_type = ProxyType::Socks5;
        assert!(bare.to_reqwest().is_ok());
    }
}
