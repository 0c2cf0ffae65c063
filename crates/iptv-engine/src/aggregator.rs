//! Concurrent multi-source catalog loading with last-request-wins publication.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use m3u::PlaylistEntry;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, SourceSpec};
use crate::fetcher::PlaylistFetcher;

/// Result of a [`Aggregator::load`] call.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// This load was the latest request when it settled and is now the visible catalog.
    Published(Arc<Catalog>),
    /// A newer load started before this one settled. Its result was discarded.
    Superseded,
}

impl LoadOutcome {
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            Self::Published(catalog) => Some(catalog),
            Self::Superseded => None,
        }
    }
}

pub struct Aggregator<F> {
    fetcher: F,
    generation: AtomicU64,
    published: watch::Sender<Arc<Catalog>>,
}

impl<F: PlaylistFetcher> Aggregator<F> {
    pub fn new(fetcher: F) -> Self {
        let (published, _) = watch::channel(Arc::new(Catalog::default()));
        Self {
            fetcher,
            generation: AtomicU64::new(0),
            published,
        }
    }

    /// Receiver that observes every published catalog.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Catalog>> {
        self.published.subscribe()
    }

    /// The most recently published catalog.
    pub fn current(&self) -> Arc<Catalog> {
        self.published.borrow().clone()
    }

    /// Loads `spec` and publishes the result unless a newer load was issued
    /// while this one was in flight. Never fails: unreachable sources
    /// contribute no entries.
    pub async fn load(&self, spec: &SourceSpec) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, sources = spec.urls().len(), "Loading catalog");

        let catalog = self.build(spec).await;

        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            debug!(generation, latest, "Discarding superseded catalog");
            return LoadOutcome::Superseded;
        }

        info!(
            generation,
            entries = catalog.len(),
            groups = catalog.groups().len(),
            "Catalog published"
        );
        let catalog = Arc::new(catalog);
        self.published.send_replace(catalog.clone());
        LoadOutcome::Published(catalog)
    }

    async fn build(&self, spec: &SourceSpec) -> Catalog {
        match spec {
            SourceSpec::Single(url) => Catalog::from_entries(self.fetch_entries(url).await),
            SourceSpec::Pack(urls) => {
                // join_all yields results in input order, whatever order the fetches finish in.
                let results = join_all(urls.iter().map(|url| self.fetch_entries(url))).await;
                Catalog::merge(results)
            }
        }
    }

    async fn fetch_entries(&self, url: &str) -> Vec<PlaylistEntry> {
        match self.fetcher.fetch(url).await {
            Ok(text) => {
                let entries = m3u::parse(&text);
                debug!(url = %url, entries = entries.len(), "Source parsed");
                entries
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Source unavailable, contributing no entries");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeFetcher {
        bodies: HashMap<String, String>,
        gates: HashMap<String, Arc<Notify>>,
    }

    impl FakeFetcher {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }

        fn gated(mut self, url: &str, gate: Arc<Notify>) -> Self {
            self.gates.insert(url.to_string(), gate);
            self
        }
    }

    #[async_trait]
    impl PlaylistFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            if let Some(gate) = self.gates.get(url) {
                gate.notified().await;
            }
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::InvalidUrl(url.to_string()))
        }
    }

    const A: &str = "#EXTM3U\n\
        #EXTINF:-1 tvg-id=\"a1\" group-title=\"News\",A One\nhttp://s/a1\n\
        #EXTINF:-1 tvg-id=\"a-shared\" group-title=\"Sports\",A Shared\nhttp://s/shared\n";
    const B: &str = "#EXTM3U\n\
        #EXTINF:-1 tvg-id=\"b-shared\" group-title=\"Movies\",B Shared\nhttp://s/shared\n\
        #EXTINF:-1 tvg-id=\"b1\" group-title=\"Kids\",B One\nhttp://s/b1\n";

    fn ids(catalog: &Catalog) -> Vec<&str> {
        catalog.entries().iter().map(|e| e.id.as_str()).collect()
    }

    #[tokio::test]
    async fn pack_dedups_at_first_position() {
        let fetcher = FakeFetcher::default().with("a", A).with("b", B);
        let aggregator = Aggregator::new(fetcher);

        let outcome = aggregator.load(&SourceSpec::pack(["a", "b"])).await;
        let catalog = outcome.catalog().unwrap();
        assert_eq!(ids(catalog), ["a1", "a-shared", "b1"]);
        assert_eq!(catalog.groups(), ["Kids", "News", "Sports"]);
    }

    #[tokio::test]
    async fn failed_source_leaves_the_others() {
        let fetcher = FakeFetcher::default().with("b", B);
        let aggregator = Aggregator::new(fetcher);

        let pack = aggregator.load(&SourceSpec::pack(["a", "b"])).await;
        let alone = aggregator.load(&SourceSpec::single("b")).await;
        assert_eq!(pack.catalog().unwrap().as_ref(), alone.catalog().unwrap().as_ref());
    }

    #[tokio::test]
    async fn failed_single_source_publishes_empty_catalog() {
        let aggregator = Aggregator::new(FakeFetcher::default().with("a", A));
        aggregator.load(&SourceSpec::single("a")).await;
        assert_eq!(aggregator.current().len(), 2);

        let outcome = aggregator.load(&SourceSpec::single("missing")).await;
        assert!(outcome.catalog().unwrap().is_empty());
        assert!(aggregator.current().groups().is_empty());
    }

    #[tokio::test]
    async fn pack_order_ignores_completion_order() {
        let gate = Arc::new(Notify::new());
        let fetcher = FakeFetcher::default()
            .with("a", A)
            .with("b", B)
            .gated("a", gate.clone());
        let aggregator = Aggregator::new(fetcher);

        let spec = SourceSpec::pack(["a", "b"]);
        let (outcome, _) = tokio::join!(aggregator.load(&spec), async {
            tokio::task::yield_now().await;
            gate.notify_one();
        });
        assert_eq!(ids(outcome.catalog().unwrap()), ["a1", "a-shared", "b1"]);
    }

    #[tokio::test]
    async fn last_request_wins() {
        let gate = Arc::new(Notify::new());
        let fetcher = FakeFetcher::default()
            .with("slow", A)
            .with("fast", B)
            .gated("slow", gate.clone());
        let aggregator = Aggregator::new(fetcher);
        let mut updates = aggregator.subscribe();

        let slow = SourceSpec::single("slow");
        let fast = SourceSpec::single("fast");
        let (stale, fresh) = tokio::join!(aggregator.load(&slow), async {
            let outcome = aggregator.load(&fast).await;
            gate.notify_one();
            outcome
        });

        assert!(matches!(stale, LoadOutcome::Superseded));
        assert_eq!(ids(fresh.catalog().unwrap()), ["b-shared", "b1"]);
        assert_eq!(ids(&aggregator.current()), ["b-shared", "b1"]);
        assert!(updates.has_changed().unwrap());
        assert_eq!(ids(&updates.borrow_and_update()), ["b-shared", "b1"]);
    }
}
