use anyhow::{Context, Result};
use iptv_engine::{
    FetcherConfig, PlayerConfig, ProxyConfig, ViewConfig, config::DEFAULT_PASSTHROUGH_BASE,
    presets::DEFAULT_SOURCE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "iptv-cli";
const SAVED_SOURCES_FILE: &str = "saved_sources.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Playlist loaded when no source is given
    pub default_source: String,

    /// Passthrough used when a direct fetch fails
    pub passthrough_base: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Connect timeout in seconds
    pub connect_timeout: u64,

    /// Channels per page
    pub page_size: usize,

    /// Start playback as soon as a stream is ready
    pub autoplay: bool,

    /// Fatal stream errors tolerated before giving up (0 = unlimited)
    pub max_recovery_attempts: u32,

    /// Seconds to wait for a stream when probing
    pub probe_timeout: u64,

    /// Where saved sources are kept (defaults to the configuration directory)
    pub saved_sources_path: Option<PathBuf>,

    /// User agent string for requests
    pub user_agent: Option<String>,

    /// Enable colored output
    pub colored_output: bool,

    /// Default proxy URL (supports http, https, socks5)
    pub default_proxy: Option<String>,

    /// Default proxy username (if proxy requires authentication)
    pub default_proxy_username: Option<String>,

    /// Default proxy password (if proxy requires authentication)
    pub default_proxy_password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_source: DEFAULT_SOURCE.to_string(),
            passthrough_base: DEFAULT_PASSTHROUGH_BASE.to_string(),
            timeout: 30,
            connect_timeout: 10,
            page_size: ViewConfig::default().page_size,
            autoplay: true,
            max_recovery_attempts: 8,
            probe_timeout: 20,
            saved_sources_path: None,
            user_agent: None,
            colored_output: true,
            default_proxy: None,
            default_proxy_username: None,
            default_proxy_password: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                if path.exists() {
                    let content = std::fs::read_to_string(path)
                        .context("Failed to read configuration file")?;
                    toml::from_str(&content).context("Failed to parse configuration file")
                } else {
                    Ok(Self::default())
                }
            }
            None => confy::load(APP_NAME, None).context("Failed to load configuration"),
        }
    }

    /// Get default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, None).ok()
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, toml_string).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Reset configuration to defaults and save
    pub fn reset(config_path: Option<&Path>) -> Result<()> {
        let path = config_path
            .map(|p| p.to_path_buf())
            .or_else(Self::default_config_path)
            .context("No configuration path available")?;

        Self::default().save(&path)
    }

    /// Show current configuration as a formatted string
    pub fn show(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration for display")
    }

    /// Saved-source file: the configured path, or a file next to the configuration.
    pub fn saved_sources_path(&self, config_path: Option<&Path>) -> PathBuf {
        if let Some(path) = &self.saved_sources_path {
            return path.clone();
        }
        config_path
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path)
            .and_then(|p| p.parent().map(|dir| dir.join(SAVED_SOURCES_FILE)))
            .unwrap_or_else(|| PathBuf::from(SAVED_SOURCES_FILE))
    }

    pub fn fetcher_config(&self, proxy: Option<ProxyConfig>) -> FetcherConfig {
        let mut builder = FetcherConfig::builder()
            .with_passthrough_base(&self.passthrough_base)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout));
        if let Some(user_agent) = &self.user_agent {
            builder = builder.with_user_agent(user_agent);
        }
        if let Some(proxy) = proxy {
            builder = builder.with_proxy(proxy);
        }
        builder.build()
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            autoplay: self.autoplay,
            max_recovery_attempts: (self.max_recovery_attempts > 0)
                .then_some(self.max_recovery_attempts),
        }
    }

    pub fn view_config(&self) -> ViewConfig {
        ViewConfig {
            page_size: self.page_size.max(1),
        }
    }

    /// Proxy from the command line, falling back to the configured one.
    pub fn proxy(
        &self,
        url: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Option<ProxyConfig> {
        let (url, username, password) = match url {
            Some(url) => (url, username, password),
            None => (
                self.default_proxy.clone()?,
                username.or_else(|| self.default_proxy_username.clone()),
                password.or_else(|| self.default_proxy_password.clone()),
            ),
        };
        Some(ProxyConfig::new(url).with_credentials(username, password))
    }
}
