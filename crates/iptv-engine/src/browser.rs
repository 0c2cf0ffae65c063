//! Application state and the inbound command surface.
//!
//! [`AppState`] holds plain data with synchronous transitions. [`Browser`]
//! pairs it with the effects: catalog loads, the playback controller and the
//! saved-source store.

use std::sync::Arc;

use m3u::PlaylistEntry;
use tracing::{debug, info};

use crate::aggregator::{Aggregator, LoadOutcome};
use crate::catalog::{Catalog, SourceSpec};
use crate::config::ViewConfig;
use crate::error::StoreError;
use crate::fetcher::PlaylistFetcher;
use crate::player::{EngineFactory, MediaSink, PlaybackController, PlaybackSession, SessionId};
use crate::presets::{Pack, Preset};
use crate::store::{SavedSource, SourceStore};
use crate::view::{GroupFilter, PageView, Query, view};

#[derive(Debug, Clone)]
pub struct AppState {
    pub source: SourceSpec,
    pub catalog: Arc<Catalog>,
    pub query: Query,
    /// 1-based.
    pub page: usize,
    pub selected: Option<PlaylistEntry>,
    pub loading: bool,
}

impl AppState {
    pub fn new(source: SourceSpec) -> Self {
        Self {
            source,
            catalog: Arc::new(Catalog::default()),
            query: Query::default(),
            page: 1,
            selected: None,
            loading: false,
        }
    }

    /// New source: nothing selected, search reset to `initial_query`, all groups, first page.
    pub fn select_source(&mut self, source: SourceSpec, initial_query: &str) {
        self.source = source;
        self.query = Query::new(initial_query, GroupFilter::All);
        self.page = 1;
        self.selected = None;
        self.loading = true;
    }

    pub fn apply_catalog(&mut self, catalog: Arc<Catalog>) {
        self.catalog = catalog;
        self.loading = false;
    }

    /// Any change to the query returns to the first page.
    pub fn set_query(&mut self, query: Query) {
        if query != self.query {
            self.query = query;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn view(&self, page_size: usize) -> PageView<'_> {
        view(&self.catalog, &self.query, self.page, page_size)
    }
}

pub struct Browser<F, E, S>
where
    F: PlaylistFetcher,
    E: EngineFactory,
    S: MediaSink,
{
    aggregator: Aggregator<F>,
    player: PlaybackController<E, S>,
    store: Box<dyn SourceStore>,
    state: AppState,
    view_config: ViewConfig,
}

impl<F, E, S> Browser<F, E, S>
where
    F: PlaylistFetcher,
    E: EngineFactory,
    S: MediaSink,
{
    pub fn new(
        aggregator: Aggregator<F>,
        player: PlaybackController<E, S>,
        store: Box<dyn SourceStore>,
        view_config: ViewConfig,
    ) -> Self {
        Self {
            aggregator,
            player,
            store,
            state: AppState::new(SourceSpec::Pack(Vec::new())),
            view_config,
        }
    }

    /// Replaces the current source and loads its catalog. The player is closed first.
    pub async fn select_source(&mut self, spec: SourceSpec, initial_query: &str) -> LoadOutcome {
        self.player.close();
        self.state.select_source(spec.clone(), initial_query);

        let outcome = self.aggregator.load(&spec).await;
        match &outcome {
            LoadOutcome::Published(catalog) => self.state.apply_catalog(catalog.clone()),
            LoadOutcome::Superseded => debug!("Source load superseded before it settled"),
        }
        outcome
    }

    pub async fn select_preset(&mut self, preset: &Preset) -> LoadOutcome {
        self.select_source(preset.spec(), "").await
    }

    pub async fn select_pack(&mut self, pack: &Pack) -> LoadOutcome {
        self.select_source(pack.spec(), pack.initial_query).await
    }

    pub async fn select_saved(&mut self, index: usize) -> Result<LoadOutcome, StoreError> {
        let saved = self.saved_at(index)?.clone();
        Ok(self.select_source(SourceSpec::Single(saved.url), "").await)
    }

    /// Saves `url` under `name` (or `Playlist <n>`) and loads it.
    /// A blank URL is ignored.
    pub async fn submit_custom_source(
        &mut self,
        url: &str,
        name: Option<&str>,
    ) -> Result<Option<LoadOutcome>, StoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(None);
        }
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("Playlist {}", self.store.list().len() + 1),
        };
        info!(name = %name, url = %url, "Saving custom source");
        self.store.append(SavedSource::new(name, url))?;
        Ok(Some(self.select_source(SourceSpec::single(url), "").await))
    }

    /// Starts playback of the entry at `index` in the published catalog
    /// (see [`crate::PageItem::index`]).
    pub fn select_entry(&mut self, index: usize) -> Option<SessionId> {
        let entry = self.state.catalog.get(index)?.clone();
        let session = self.player.select(entry.stream_url.as_str());
        self.state.selected = Some(entry);
        Some(session)
    }

    pub fn close_player(&mut self) {
        self.player.close();
        self.state.selected = None;
    }

    pub fn set_query(&mut self, text: impl Into<String>, group: impl Into<GroupFilter>) {
        self.state.set_query(Query::new(text, group));
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.set_page(page);
    }

    pub fn save_source(&mut self, name: &str, url: &str) -> Result<(), StoreError> {
        self.store.append(SavedSource::new(name, url))
    }

    pub fn delete_source(&mut self, index: usize) -> Result<SavedSource, StoreError> {
        self.store.remove_at(index)
    }

    pub fn saved_sources(&self) -> &[SavedSource] {
        self.store.list()
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.state.catalog.clone()
    }

    pub fn view(&self) -> PageView<'_> {
        self.state.view(self.view_config.page_size)
    }

    pub fn playback_state(&self) -> PlaybackSession {
        self.player.session()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Controller access for driving engine events.
    pub fn player_mut(&mut self) -> &mut PlaybackController<E, S> {
        &mut self.player
    }

    fn saved_at(&self, index: usize) -> Result<&SavedSource, StoreError> {
        let saved = self.store.list();
        saved.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: saved.len(),
        })
    }
}
