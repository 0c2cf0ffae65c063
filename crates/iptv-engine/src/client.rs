use reqwest::Client;
use tracing::{debug, info};

use crate::{FetchError, FetcherConfig};

/// Creates the HTTP client shared by the direct and the passthrough attempt.
pub fn create_client(config: &FetcherConfig) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .user_agent(&config.user_agent)
        .redirect(reqwest::redirect::Policy::limited(10))
        .pool_max_idle_per_host(4);

    if !config.timeout.is_zero() {
        builder = builder.timeout(config.timeout);
    }
    if !config.connect_timeout.is_zero() {
        builder = builder.connect_timeout(config.connect_timeout);
    }

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(proxy.to_reqwest()?);
        info!(proxy_url = %proxy.url, "Using explicitly configured proxy for playlist requests");
    } else if config.use_system_proxy {
        debug!("Using system proxy settings for playlist requests");
    } else {
        builder = builder.no_proxy();
        debug!("Proxy disabled for playlist requests");
    }

    builder.build().map_err(FetchError::from)
}
