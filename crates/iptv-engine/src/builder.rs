//! # Builder for FetcherConfig
//!
//! ```
//! use std::time::Duration;
//! use iptv_engine::{FetcherConfig, ProxyConfig};
//!
//! let config = FetcherConfig::builder()
//!     .with_timeout(Duration::from_secs(15))
//!     .with_passthrough_base("https://passthrough.example/raw")
//!     .with_proxy(ProxyConfig::new("socks5://127.0.0.1:1080"))
//!     .build();
//!
//! assert!(!config.use_system_proxy);
//! ```

use std::time::Duration;

use crate::{FetcherConfig, proxy::ProxyConfig};

#[derive(Debug, Clone, Default)]
pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_passthrough_base(mut self, base: impl Into<String>) -> Self {
        self.config.passthrough_base = base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Sets an explicit outbound proxy. Disables the system proxy.
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self.config.use_system_proxy = false;
        self
    }

    pub fn with_system_proxy(mut self, enabled: bool) -> Self {
        self.config.use_system_proxy = enabled;
        self
    }

    pub fn build(self) -> FetcherConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PASSTHROUGH_BASE;

    #[test]
    fn test_builder_defaults() {
        let config = FetcherConfigBuilder::new().build();
        assert_eq!(config.passthrough_base, DEFAULT_PASSTHROUGH_BASE);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.use_system_proxy);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_builder_customization() {
        let config = FetcherConfigBuilder::new()
            .with_timeout(Duration::from_secs(5))
            .with_connect_timeout(Duration::from_secs(2))
            .with_user_agent("iptv-test/1.0")
            .with_passthrough_base("http://127.0.0.1:9/raw")
            .with_system_proxy(false)
            .build();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.user_agent, "iptv-test/1.0");
        assert_eq!(config.passthrough_base, "http://127.0.0.1:9/raw");
        assert!(!config.use_system_proxy);
    }

    #[test]
    fn test_explicit_proxy_disables_system_proxy() {
        let config = FetcherConfigBuilder::new()
            .with_proxy(ProxyConfig::new("http://proxy.example.com:8080"))
            .build();
        assert!(!config.use_system_proxy);
        assert_eq!(config.proxy.unwrap().url, "http://proxy.example.com:8080");
    }
}
