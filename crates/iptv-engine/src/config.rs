use std::time::Duration;

use crate::proxy::ProxyConfig;

/// Public passthrough that echoes the body of `?url=<target>` verbatim.
pub const DEFAULT_PASSTHROUGH_BASE: &str = "https://api.allorigins.win/raw";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Entries per page in the catalog view.
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// HTTP settings for playlist retrieval.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Fallback passthrough. The original URL is appended as the `url` query parameter.
    pub passthrough_base: String,

    /// Overall timeout for one request, applied to the direct and the proxied attempt separately.
    pub timeout: Duration,

    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,

    pub user_agent: String,

    /// Outbound proxy for all requests.
    pub proxy: Option<ProxyConfig>,

    /// Honour system proxy settings when no explicit proxy is set.
    pub use_system_proxy: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            passthrough_base: DEFAULT_PASSTHROUGH_BASE.to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            proxy: None,
            use_system_proxy: true,
        }
    }
}

impl FetcherConfig {
    pub fn builder() -> crate::builder::FetcherConfigBuilder {
        crate::builder::FetcherConfigBuilder::new()
    }
}

/// Playback session behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Start playback as soon as the manifest (or native metadata) is ready.
    pub autoplay: bool,

    /// Fatal network/media errors tolerated before the session fails.
    /// The counter resets every time the session reaches `Playing`.
    /// `None` retries forever.
    pub max_recovery_attempts: Option<u32>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            max_recovery_attempts: Some(8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
