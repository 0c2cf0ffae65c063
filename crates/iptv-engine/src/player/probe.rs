//! A [`StreamEngine`] that checks reachability instead of decoding.
//!
//! Fetches the stream manifest, follows the highest-bandwidth variant of a
//! master playlist, and reports through the same events a real engine would:
//! `ManifestParsed` once a manifest parses, `Progress` once media segments are
//! listed, and a fatal network-class error otherwise.

use std::time::Duration;

use m3u8_rs::{Playlist, parse_playlist_res};
use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use url::Url;

use super::engine::{
    EngineError, EngineErrorKind, EngineFactory, MediaSink, PlayerEvent, SessionNotifier,
    StreamEngine,
};

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ManifestProbeFactory {
    client: Client,
    timeout: Duration,
}

impl ManifestProbeFactory {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl EngineFactory for ManifestProbeFactory {
    type Engine = ManifestProbeEngine;

    fn is_supported(&self) -> bool {
        true
    }

    fn create(&self, notifier: SessionNotifier) -> ManifestProbeEngine {
        ManifestProbeEngine {
            client: self.client.clone(),
            timeout: self.timeout,
            notifier,
            url: None,
            task: None,
        }
    }
}

pub struct ManifestProbeEngine {
    client: Client,
    timeout: Duration,
    notifier: SessionNotifier,
    url: Option<String>,
    task: Option<JoinHandle<()>>,
}

impl ManifestProbeEngine {
    fn start(&mut self) {
        self.abort();
        let Some(url) = self.url.clone() else {
            return;
        };
        let client = self.client.clone();
        let timeout = self.timeout;
        let notifier = self.notifier.clone();
        self.task = Some(tokio::spawn(async move {
            for event in probe(&client, &url, timeout).await {
                if !notifier.notify(event) {
                    break;
                }
            }
        }));
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl StreamEngine for ManifestProbeEngine {
    fn load(&mut self, url: &str) {
        self.url = Some(url.to_string());
        self.start();
    }

    fn attach(&mut self, _sink: &mut dyn MediaSink) {
        trace!(session = self.notifier.session(), "Probe engine attached");
    }

    fn reload(&mut self) {
        debug!(session = self.notifier.session(), "Reloading manifest");
        self.start();
    }

    fn recover_media(&mut self) {
        // Nothing is decoded, so the pipeline is always intact.
        self.notifier.notify(PlayerEvent::Progress);
    }

    fn destroy(&mut self) {
        self.abort();
    }
}

impl Drop for ManifestProbeEngine {
    fn drop(&mut self) {
        self.abort();
    }
}

async fn probe(client: &Client, url: &str, timeout: Duration) -> Vec<PlayerEvent> {
    let network = |details: String| {
        vec![PlayerEvent::Error(EngineError::fatal(
            EngineErrorKind::Network,
            details,
        ))]
    };

    let (playlist, base) = match fetch_manifest(client, url, timeout).await {
        Ok(manifest) => manifest,
        Err(details) => return network(details),
    };

    let media = match playlist {
        Playlist::MediaPlaylist(media) => media,
        Playlist::MasterPlaylist(master) => {
            let Some(variant) = master.variants.iter().max_by_key(|v| v.bandwidth) else {
                return network(format!("master playlist {url} lists no variants"));
            };
            let variant_url = match base.join(&variant.uri) {
                Ok(u) => u.to_string(),
                Err(e) => return network(format!("invalid variant URI {}: {e}", variant.uri)),
            };
            debug!(variant = %variant_url, bandwidth = variant.bandwidth, "Following variant");
            match fetch_manifest(client, &variant_url, timeout).await {
                Ok((Playlist::MediaPlaylist(media), _)) => media,
                Ok((Playlist::MasterPlaylist(_), _)) => {
                    return network(format!("variant {variant_url} is another master playlist"));
                }
                Err(details) => return network(details),
            }
        }
    };

    let mut events = vec![PlayerEvent::ManifestParsed];
    if media.segments.is_empty() {
        events.push(PlayerEvent::Error(EngineError::non_fatal(
            EngineErrorKind::Media,
            "media playlist has no segments yet",
        )));
    } else {
        events.push(PlayerEvent::Progress);
    }
    events
}

async fn fetch_manifest(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<(Playlist, Url), String> {
    let base = Url::parse(url).map_err(|e| format!("invalid manifest URL {url}: {e}"))?;
    let response = client
        .get(base.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| format!("request for {url} failed: {e}"))?;
    if !response.status().is_success() {
        return Err(format!("manifest {url} returned HTTP {}", response.status()));
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| format!("reading manifest {url} failed: {e}"))?;
    let playlist =
        parse_playlist_res(&body).map_err(|e| format!("failed to parse manifest {url}: {e}"))?;
    Ok((playlist, base))
}
