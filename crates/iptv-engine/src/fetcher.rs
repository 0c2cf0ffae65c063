//! Playlist retrieval with one passthrough fallback.
//!
//! Exactly two attempts per call: the original URL, then
//! `<passthrough_base>?url=<encoded original>`. Neither path is retried.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::{FetchError, FetcherConfig, client::create_client};

/// Source of playlist document text.
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: PlaylistFetcher + ?Sized> PlaylistFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

pub struct HttpFetcher {
    client: Client,
    config: Arc<FetcherConfig>,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = create_client(&config)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: FetcherConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Builds the passthrough request URL for `url`.
    pub fn passthrough_url(&self, url: &str) -> Result<Url, FetchError> {
        let mut proxied = Url::parse(&self.config.passthrough_base).map_err(|e| {
            FetchError::InvalidUrl(format!("{}: {e}", self.config.passthrough_base))
        })?;
        proxied.query_pairs_mut().append_pair("url", url);
        Ok(proxied)
    }

    async fn get_text(&self, url: Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PlaylistFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        // An unparsable URL counts as a failed direct attempt; the passthrough still gets it.
        let direct = match Url::parse(url) {
            Ok(target) => match self.get_text(target).await {
                Ok(body) => {
                    debug!(url = %url, bytes = body.len(), "Fetched playlist directly");
                    return Ok(body);
                }
                Err(e) => e,
            },
            Err(e) => FetchError::InvalidUrl(format!("{url}: {e}")),
        };
        warn!(url = %url, error = %direct, "Direct fetch failed, trying passthrough");

        let proxied = self.passthrough_url(url)?;
        match self.get_text(proxied).await {
            Ok(body) => {
                debug!(url = %url, bytes = body.len(), "Fetched playlist through passthrough");
                Ok(body)
            }
            Err(proxy) => Err(FetchError::Exhausted {
                direct: Box::new(direct),
                proxy: Box::new(proxy),
            }),
        }
    }
}
